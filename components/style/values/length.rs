/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Lengths with units.

use crate::values::Font;
use std::fmt;

/// Number of px per inch.
pub const PX_PER_IN: f64 = 96.;
/// Number of px per point.
pub const PX_PER_PT: f64 = PX_PER_IN / 72.;
/// Number of px per pica.
pub const PX_PER_PC: f64 = PX_PER_PT * 12.;
/// Number of px per centimeter.
pub const PX_PER_CM: f64 = PX_PER_IN / 2.54;
/// Number of px per millimeter.
pub const PX_PER_MM: f64 = PX_PER_CM / 10.;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SizeUnits {
    Px,
    Em,
    /// Half an em. There are no font metrics available here to do better.
    Ex,
    Percent,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
}

impl SizeUnits {
    /// Whether a length in these units depends on the font size.
    pub fn is_font_relative(self) -> bool {
        matches!(self, SizeUnits::Em | SizeUnits::Ex)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnits::Px => "px",
            SizeUnits::Em => "em",
            SizeUnits::Ex => "ex",
            SizeUnits::Percent => "%",
            SizeUnits::Pt => "pt",
            SizeUnits::Pc => "pc",
            SizeUnits::In => "in",
            SizeUnits::Cm => "cm",
            SizeUnits::Mm => "mm",
        }
    }
}

/// A number together with its units, as written in a declaration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub value: f64,
    pub units: SizeUnits,
}

impl Size {
    pub fn new(value: f64, units: SizeUnits) -> Self {
        Size { value, units }
    }

    pub fn px(value: f64) -> Self {
        Size::new(value, SizeUnits::Px)
    }

    /// Convert to px. Percentages are taken of `multiplier`; font-relative
    /// units are taken of the size of `font`.
    pub fn pixels_with(&self, multiplier: f64, font: &Font) -> f64 {
        match self.units {
            SizeUnits::Px => self.value,
            SizeUnits::Em => self.value * font.size(),
            SizeUnits::Ex => self.value * font.size() / 2.,
            SizeUnits::Percent => self.value / 100. * multiplier,
            SizeUnits::Pt => self.value * PX_PER_PT,
            SizeUnits::Pc => self.value * PX_PER_PC,
            SizeUnits::In => self.value * PX_PER_IN,
            SizeUnits::Cm => self.value * PX_PER_CM,
            SizeUnits::Mm => self.value * PX_PER_MM,
        }
    }

    /// Convert to px, with percentages taken of 1.
    pub fn pixels(&self, font: &Font) -> f64 {
        self.pixels_with(1., font)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.value, self.units.as_str())
    }
}
