/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Types and traits used to access the scene graph. This exists so that the
//! engine does not depend on any particular node implementation.

#![deny(missing_docs)]

use crate::helper::StyleHelper;
use crate::properties::{CssMetaData, CssMetaDataList};
use crate::pseudo_class::PseudoClassState;
use crate::stylesheets::StyleOrigin;
use crate::values::StyleValue;
use std::cell::{Ref, RefMut};
use std::error::Error;
use std::fmt::Debug;

/// A handle to a node of the scene graph that CSS can style.
///
/// Handles are cheap to copy. The node owns an optional slot for its
/// `StyleHelper`; the engine fills and empties that slot explicitly.
pub trait Styleable: Sized + Copy + Debug {
    /// The concrete styleable property type of this node.
    type Property: StyleableProperty;

    /// The parent of this node for the purposes of CSS, which may differ
    /// from its parent in the scene graph.
    fn styleable_parent(&self) -> Option<Self>;

    /// The descriptors of the styleable properties of this node, in
    /// declaration order.
    fn css_meta_data(&self) -> CssMetaDataList;

    /// Whether this node matches `compound`, a compound selector written
    /// without its pseudo-classes, such as `.group` or `Button#ok`.
    fn matches_compound(&self, compound: &str) -> bool;

    /// The pseudo-classes this node is currently in.
    fn pseudo_class_states(&self) -> PseudoClassState;

    /// The property of this node described by `meta`, if it has one.
    fn styleable_property(&self, meta: &CssMetaData) -> Option<Self::Property>;

    /// Borrow the style helper attached to this node.
    fn style_helper(&self) -> Option<Ref<'_, StyleHelper>>;

    /// Mutably borrow the style helper attached to this node.
    fn style_helper_mut(&self) -> Option<RefMut<'_, StyleHelper>>;

    /// Attach `helper` to this node, returning the previous one.
    fn set_style_helper(&self, helper: Option<StyleHelper>) -> Option<StyleHelper>;

    /// Ask for the styles of this node to be rebuilt from scratch on the
    /// next pass.
    fn request_css_reapply(&self);

    /// Whether a style helper is attached to this node.
    fn has_style_helper(&self) -> bool {
        self.style_helper().is_some()
    }
}

/// A property of a node whose value CSS can set.
pub trait StyleableProperty {
    /// The current value.
    fn value(&self) -> Option<StyleValue>;

    /// Who set the current value, or `None` if it is the initial value.
    fn style_origin(&self) -> Option<StyleOrigin>;

    /// Set the value and record who set it. The property may reject the
    /// value.
    fn apply_style(
        &self,
        origin: Option<StyleOrigin>,
        value: Option<StyleValue>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Whether CSS may set this property at all, which is not the case when
    /// it is bound.
    fn is_settable(&self) -> bool {
        true
    }
}
