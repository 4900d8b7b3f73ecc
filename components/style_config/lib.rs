/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Preferences consumed by the style engine.
//!
//! Preferences are plain data owned by whoever constructs the style context;
//! there is no process-wide preference store.

use log::warn;
use serde::{Deserialize, Serialize};

/// The family used when no font has been resolved for a node.
pub const DEFAULT_FONT_FAMILY: &str = "System";

/// The size, in px, used when no font has been resolved for a node.
pub const DEFAULT_FONT_SIZE: f64 = 13.0;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Preferences {
    /// Family of the default font, used as the reference font for
    /// font-relative units when no ancestor provides one.
    pub default_font_family: String,
    /// Size of the default font, in px.
    pub default_font_size: f64,
    /// Emit a `trace!` line for every style applied to a property.
    pub log_applied_styles: bool,
    /// Whether an existing shared cache entry may be trusted wholesale. When
    /// off, every property takes the slow path: values the entry holds are
    /// reused and missing ones are resolved. Only useful for debugging.
    pub use_fast_path: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            default_font_family: DEFAULT_FONT_FAMILY.to_owned(),
            default_font_size: DEFAULT_FONT_SIZE,
            log_applied_styles: false,
            use_fast_path: true,
        }
    }
}

impl Preferences {
    /// Parse preferences from a JSON object. Missing keys keep their default
    /// value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let prefs: Preferences = serde_json::from_str(json)?;
        Ok(prefs.validated())
    }

    /// Replace values that cannot be used by the engine with their defaults.
    pub fn validated(mut self) -> Self {
        if !self.default_font_size.is_finite() || self.default_font_size <= 0. {
            warn!(
                "Ignoring invalid default font size {}, using {}",
                self.default_font_size, DEFAULT_FONT_SIZE
            );
            self.default_font_size = DEFAULT_FONT_SIZE;
        }
        if self.default_font_family.trim().is_empty() {
            warn!("Ignoring empty default font family, using {}", DEFAULT_FONT_FAMILY);
            self.default_font_family = DEFAULT_FONT_FAMILY.to_owned();
        }
        self
    }
}
