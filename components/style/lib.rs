/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Calculate [specified][specified] and [computed values][computed] for the
//! styleable properties of a retained-mode scene graph.
//!
//! [specified]: https://drafts.csswg.org/css2/cascade.html#specified-value
//! [computed]: https://drafts.csswg.org/css2/cascade.html#computed-value
//!
//! The entry point is [`SharedStyleContext::process_css`]. Given a node that
//! implements [`Styleable`] and an external [`StyleMatcher`] that knows which
//! rules structurally apply to it, the engine attaches a [`StyleHelper`] to
//! the node, resolves every styleable property through the cascade, and
//! applies the result.
//!
//! Computed values are shared between nodes: any two nodes with the same
//! chain of style maps, the same relevant pseudo-class state and the same
//! reference font resolve to the same cache entry.
//!
//! All resolution happens on the UI thread during a pulse. The process-wide
//! cache buckets are behind locks so that a stylesheet loader running on
//! another thread may invalidate them.
//!
//! [`SharedStyleContext::process_css`]: context::SharedStyleContext::process_css
//! [`Styleable`]: dom::Styleable
//! [`StyleMatcher`]: style_map::StyleMatcher
//! [`StyleHelper`]: helper::StyleHelper

#![deny(unsafe_code)]

pub mod cache;
pub mod context;
pub mod converters;
pub mod dom;
pub mod error_reporting;
pub mod helper;
pub mod properties;
pub mod pseudo_class;
pub mod style_map;
pub mod stylesheets;
pub mod values;

pub use string_cache::DefaultAtom as Atom;

pub use crate::cache::{CalculatedValue, LookupResult};
pub use crate::context::{CssFlags, SharedStyleContext};
pub use crate::dom::{Styleable, StyleableProperty};
pub use crate::helper::StyleHelper;
pub use crate::stylesheets::StyleOrigin;

/// Name of the font shorthand every font-bearing node declares.
pub const FONT_PROPERTY: &str = "-fx-font";
