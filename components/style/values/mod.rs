/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Declared and computed values of styleable properties.

use crate::Atom;
use std::fmt;

pub mod color;
pub mod font;
pub mod length;
pub mod parsed;

pub use self::color::Color;
pub use self::font::{Font, FontPosture, FontWeight};
pub use self::length::{Size, SizeUnits};
pub use self::parsed::{ParsedValue, Value};

/// Offsets from the four sides of a box, in px.
pub type Insets = euclid::default::SideOffsets2D<f64>;

/// A computed value, ready to be applied to a styleable property.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Boolean(bool),
    /// A number or a length in px.
    Number(f64),
    String(String),
    Ident(Atom),
    Color(Color),
    Font(Font),
    FontWeight(FontWeight),
    FontPosture(FontPosture),
    Insets(Insets),
}

impl StyleValue {
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            StyleValue::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&Font> {
        match *self {
            StyleValue::Font(ref font) => Some(font),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match *self {
            StyleValue::Color(color) => Some(color),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StyleValue::Boolean(b) => write!(f, "{}", b),
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::String(ref s) => write!(f, "\"{}\"", s),
            StyleValue::Ident(ref ident) => f.write_str(ident),
            StyleValue::Color(color) => write!(f, "{}", color),
            StyleValue::Font(ref font) => write!(f, "{}", font),
            StyleValue::FontWeight(weight) => write!(f, "{}", weight),
            StyleValue::FontPosture(FontPosture::Regular) => f.write_str("regular"),
            StyleValue::FontPosture(FontPosture::Italic) => f.write_str("italic"),
            StyleValue::Insets(insets) => write!(
                f,
                "{} {} {} {}",
                insets.top, insets.right, insets.bottom, insets.left
            ),
        }
    }
}
