/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Style maps: the styles that structurally apply to a node, grouped by
//! property.

use crate::Atom;
use crate::context::SharedStyleContext;
use crate::dom::Styleable;
use crate::pseudo_class::PseudoClassState;
use crate::stylesheets::CascadingStyle;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Identifies a style map. Nodes whose chains of style map ids are equal can
/// share computed values.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StyleMapId(pub u32);

impl StyleMapId {
    /// The id of the map used for nodes no style applies to.
    pub const EMPTY: StyleMapId = StyleMapId(u32::MAX);
}

/// The styles that may apply to a node, per property, each list sorted from
/// highest to lowest cascade precedence.
#[derive(Debug)]
pub struct StyleMap {
    id: StyleMapId,
    styles: FxHashMap<Atom, Vec<CascadingStyle>>,
}

impl StyleMap {
    pub fn new<I>(id: StyleMapId, styles: I) -> Self
    where
        I: IntoIterator<Item = CascadingStyle>,
    {
        let mut by_property: FxHashMap<Atom, Vec<CascadingStyle>> = FxHashMap::default();
        for style in styles {
            by_property
                .entry(style.property().clone())
                .or_default()
                .push(style);
        }
        for list in by_property.values_mut() {
            list.sort_by(|a, b| b.cmp_precedence(a));
        }
        StyleMap {
            id,
            styles: by_property,
        }
    }

    pub fn empty(id: StyleMapId) -> Self {
        StyleMap {
            id,
            styles: FxHashMap::default(),
        }
    }

    pub fn id(&self) -> StyleMapId {
        self.id
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The candidate styles for `property`, best first.
    pub fn cascading_styles(&self, property: &str) -> &[CascadingStyle] {
        self.styles
            .get(&Atom::from(property))
            .map(|styles| &styles[..])
            .unwrap_or(&[])
    }

    pub fn properties(&self) -> impl Iterator<Item = &Atom> {
        self.styles.keys()
    }
}

/// Finds the styles that structurally apply to a node.
pub trait StyleMatcher<E: Styleable> {
    /// Return the style map for `node`, or `None` if no style applies.
    ///
    /// `trigger_states` has one slot per node from `node` up to the root of
    /// the styleable tree. The matcher adds to slot `n` the pseudo-classes of
    /// the `n`th ancestor that selectors it matched depend on. The
    /// pseudo-classes of an ancestor compound are added to every ancestor
    /// matching that compound, since any of them may satisfy it.
    fn find_matching_styles(
        &self,
        context: &SharedStyleContext,
        node: E,
        trigger_states: &mut [PseudoClassState],
    ) -> Option<Arc<StyleMap>>;
}
