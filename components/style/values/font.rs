/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Font related computed values.

use crate::Atom;
use app_units::Au;
use std::fmt;

/// Only the following values are valid:
/// 100 | 200 | 300 | 400 | 500 | 600 | 700 | 800 | 900
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Value for normal
    pub fn normal() -> Self {
        FontWeight(400)
    }

    /// Value for bold
    pub fn bold() -> Self {
        FontWeight(700)
    }

    /// Convert from an integer to a weight.
    pub fn from_int(n: i32) -> Option<Self> {
        if (100..=900).contains(&n) && n % 100 == 0 {
            Some(FontWeight(n as u16))
        } else {
            None
        }
    }

    /// Whether this weight is bold
    pub fn is_bold(&self) -> bool {
        self.0 > 500
    }

    /// Return the bolder weight
    pub fn bolder(self) -> Self {
        if self.0 < 400 {
            FontWeight(400)
        } else if self.0 < 600 {
            FontWeight(700)
        } else {
            FontWeight(900)
        }
    }

    /// Return the lighter weight
    pub fn lighter(self) -> Self {
        if self.0 < 600 {
            FontWeight(100)
        } else if self.0 < 800 {
            FontWeight(400)
        } else {
            FontWeight(700)
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FontPosture {
    Regular,
    Italic,
}

impl FontPosture {
    pub fn from_ident(ident: &str) -> Option<Self> {
        match ident.to_ascii_lowercase().as_str() {
            "normal" | "regular" => Some(FontPosture::Regular),
            "italic" | "oblique" => Some(FontPosture::Italic),
            _ => None,
        }
    }
}

/// A resolved font.
///
/// The size is stored in app units so that fonts can be compared and hashed
/// exactly; fonts are part of the key of the computed value caches.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Font {
    pub family: Atom,
    pub weight: FontWeight,
    pub posture: FontPosture,
    size: Au,
}

impl Font {
    pub fn new(family: &str, weight: FontWeight, posture: FontPosture, size: f64) -> Self {
        Font {
            family: Atom::from(strip_quotes(family)),
            weight,
            posture,
            size: Au::from_f64_px(size),
        }
    }

    /// A font of the given family and size, with normal weight and regular
    /// posture.
    pub fn plain(family: &str, size: f64) -> Self {
        Font::new(family, FontWeight::normal(), FontPosture::Regular, size)
    }

    /// The size of this font, in px.
    pub fn size(&self) -> f64 {
        self.size.to_f64_px()
    }

    pub fn with_size(&self, size: f64) -> Self {
        Font {
            size: Au::from_f64_px(size),
            ..self.clone()
        }
    }

    pub fn with_family(&self, family: &str) -> Self {
        Font {
            family: Atom::from(strip_quotes(family)),
            ..self.clone()
        }
    }

    pub fn with_weight(&self, weight: FontWeight) -> Self {
        Font {
            weight,
            ..self.clone()
        }
    }

    pub fn with_posture(&self, posture: FontPosture) -> Self {
        Font {
            posture,
            ..self.clone()
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}px \"{}\" {}", self.size(), self.family, self.weight)?;
        if self.posture == FontPosture::Italic {
            f.write_str(" italic")?;
        }
        Ok(())
    }
}

/// Remove one level of matching single or double quotes.
pub fn strip_quotes(family: &str) -> &str {
    let trimmed = family.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}
