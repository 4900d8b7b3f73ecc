/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The rule model consumed by the engine: declarations, selectors and the
//! styles pairing them.
//!
//! Parsing stylesheets and matching the structural part of selectors are
//! done elsewhere; what is left here is what the cascade needs.

use crate::Atom;
use crate::dom::Styleable;
use crate::pseudo_class::PseudoClassState;
use crate::values::ParsedValue;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Where a style comes from, in increasing order of precedence.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StyleOrigin {
    /// The stylesheet of the toolkit.
    UserAgent,
    /// A stylesheet added by the application.
    Author,
    /// The inline style of a node.
    Inline,
    /// A value set directly on the property by application code.
    User,
}

/// A single `property: value` declaration.
#[derive(Debug)]
pub struct Declaration {
    pub property: Atom,
    pub value: Arc<ParsedValue>,
    pub origin: StyleOrigin,
    /// The url of the stylesheet the declaration was parsed from, if any.
    pub stylesheet_url: Option<Arc<str>>,
}

impl Declaration {
    pub fn new(property: &str, value: ParsedValue, origin: StyleOrigin) -> Self {
        Declaration {
            property: Atom::from(property),
            value: Arc::new(value),
            origin,
            stylesheet_url: None,
        }
    }

    pub fn with_stylesheet_url(mut self, url: &str) -> Self {
        self.stylesheet_url = Some(Arc::from(url));
        self
    }
}

/// A compound of a selector that some ancestor of the subject must match,
/// for example `.group:hover` in `.group:hover .rect`.
#[derive(Clone, Debug)]
pub struct AncestorCompound {
    /// The compound without its pseudo-classes, as written in the rule.
    pub compound: Atom,
    /// Pseudo-classes the matching ancestor must be in.
    pub pseudo_classes: PseudoClassState,
}

/// The pseudo-class part of a selector.
#[derive(Clone, Debug, Default)]
pub struct Selector {
    text: String,
    /// Pseudo-classes the subject must be in.
    pseudo_classes: PseudoClassState,
    /// Compounds ancestors must match, nearest first.
    ancestors: SmallVec<[AncestorCompound; 2]>,
}

impl Selector {
    pub fn new(text: &str) -> Self {
        Selector {
            text: text.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_pseudo_classes(mut self, pseudo_classes: PseudoClassState) -> Self {
        self.pseudo_classes = pseudo_classes;
        self
    }

    /// Require an ancestor matching `compound`, further up than the ones
    /// required so far, to be in all of `pseudo_classes`.
    pub fn with_ancestor(mut self, compound: &str, pseudo_classes: PseudoClassState) -> Self {
        self.ancestors.push(AncestorCompound {
            compound: Atom::from(compound),
            pseudo_classes,
        });
        self
    }

    pub fn pseudo_classes(&self) -> &PseudoClassState {
        &self.pseudo_classes
    }

    pub fn ancestors(&self) -> &[AncestorCompound] {
        &self.ancestors
    }

    /// Whether a node in `states` satisfies the pseudo-classes of this
    /// selector, given the current state of its ancestors.
    ///
    /// Only ancestors that match a compound are consulted for its
    /// pseudo-classes, so the state of unrelated ancestors never matters.
    pub fn state_matches<E: Styleable>(&self, node: E, states: &PseudoClassState) -> bool {
        states.contains_all(&self.pseudo_classes) &&
            ancestors_match(&self.ancestors, node.styleable_parent())
    }
}

/// Whether `compounds` can be matched, in order, by ancestors from `from`
/// up, each in the pseudo-classes its compound requires.
fn ancestors_match<E: Styleable>(compounds: &[AncestorCompound], from: Option<E>) -> bool {
    let (required, rest) = match compounds.split_first() {
        Some(split) => split,
        None => return true,
    };
    let mut ancestor = from;
    while let Some(current) = ancestor {
        ancestor = current.styleable_parent();
        if current.matches_compound(&required.compound) &&
            current
                .pseudo_class_states()
                .contains_all(&required.pseudo_classes) &&
            ancestors_match(rest, ancestor)
        {
            return true;
        }
    }
    false
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A declaration together with the selector of the rule it belongs to.
#[derive(Debug)]
pub struct Style {
    pub selector: Selector,
    pub declaration: Declaration,
}

impl Style {
    pub fn new(selector: Selector, declaration: Declaration) -> Self {
        Style {
            selector,
            declaration,
        }
    }
}

/// A style that applies to some node, with what is needed to order it in
/// the cascade.
#[derive(Clone, Debug)]
pub struct CascadingStyle {
    pub style: Arc<Style>,
    pub specificity: u32,
    /// Position of the declaration in source order, across all stylesheets.
    pub ordinal: u32,
}

impl CascadingStyle {
    pub fn new(style: Arc<Style>, specificity: u32, ordinal: u32) -> Self {
        CascadingStyle {
            style,
            specificity,
            ordinal,
        }
    }

    pub fn property(&self) -> &Atom {
        &self.style.declaration.property
    }

    pub fn value(&self) -> &Arc<ParsedValue> {
        &self.style.declaration.value
    }

    pub fn origin(&self) -> StyleOrigin {
        self.style.declaration.origin
    }

    pub fn selector(&self) -> &Selector {
        &self.style.selector
    }

    /// Cascade precedence: higher specificity wins, then higher origin, then
    /// later source order. `Greater` means `self` wins over `other`.
    pub fn cmp_precedence(&self, other: &CascadingStyle) -> Ordering {
        self.specificity
            .cmp(&other.specificity)
            .then(self.origin().cmp(&other.origin()))
            .then(self.ordinal.cmp(&other.ordinal))
    }

    /// Whether this longhand style may override a value that came from
    /// `shorthand`.
    pub fn overrides_shorthand(&self, shorthand: &CascadingStyle) -> bool {
        self.cmp_precedence(shorthand) != Ordering::Less
    }

    /// Whether this is the same declaration of the same rule as `other`.
    pub fn same_style(&self, other: &CascadingStyle) -> bool {
        Arc::ptr_eq(&self.style, &other.style)
    }
}
