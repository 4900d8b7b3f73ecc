/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Descriptors of styleable properties.

use crate::Atom;
use crate::converters::StyleConverter;
use crate::dom::{Styleable, StyleableProperty};
use std::sync::Arc;

/// The descriptors of the styleable properties of a node.
pub type CssMetaDataList = Arc<[Arc<CssMetaData>]>;

/// Describes how CSS applies to one styleable property.
#[derive(Debug)]
pub struct CssMetaData {
    property: Atom,
    converter: StyleConverter,
    inherits: bool,
    sub_properties: Vec<Arc<CssMetaData>>,
}

impl CssMetaData {
    pub fn new(property: &str, converter: StyleConverter) -> Self {
        CssMetaData {
            property: Atom::from(property),
            converter,
            inherits: false,
            sub_properties: Vec::new(),
        }
    }

    /// Make the property take its parent's value when no style applies.
    pub fn inherited(mut self) -> Self {
        self.inherits = true;
        self
    }

    /// Declare the longhands of a shorthand property.
    pub fn with_sub_properties(mut self, sub_properties: Vec<Arc<CssMetaData>>) -> Self {
        self.sub_properties = sub_properties;
        self
    }

    pub fn property(&self) -> &Atom {
        &self.property
    }

    pub fn converter(&self) -> StyleConverter {
        self.converter
    }

    pub fn inherits(&self) -> bool {
        self.inherits
    }

    pub fn sub_properties(&self) -> &[Arc<CssMetaData>] {
        &self.sub_properties
    }

    /// Fonts are resolved on their own, see `helper::font`.
    pub fn is_font(&self) -> bool {
        self.converter == StyleConverter::Font
    }

    /// Whether CSS may set this property on `node`.
    pub fn is_settable<E: Styleable>(&self, node: E) -> bool {
        node.styleable_property(self)
            .is_some_and(|property| property.is_settable())
    }
}
