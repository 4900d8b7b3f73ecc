/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Caches of computed values, shared between nodes.
//!
//! Computed values depend on three things only: the chain of style maps from
//! a node up to the root, the pseudo-class state of the nodes in that chain
//! that matters to those style maps, and the font used for relative sizes.
//! The first picks a `StyleCache`, the other two a `StyleCacheEntry` in it.

use crate::Atom;
use crate::pseudo_class::PseudoClassState;
use crate::style_map::StyleMapId;
use crate::stylesheets::StyleOrigin;
use crate::values::{Font, StyleValue};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// The ids of the style maps of a node and of its ancestors that have one,
/// from the node up.
pub type StyleCacheKey = SmallVec<[StyleMapId; 8]>;

/// For a node and each of its ancestors that has a style helper, from the
/// node up, the pseudo-classes it is in that its style helper cares about.
pub type TransitionStates = SmallVec<[PseudoClassState; 4]>;

/// Selects a `StyleCacheEntry` within a `StyleCache`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct StyleCacheEntryKey {
    pub states: TransitionStates,
    pub font: Font,
}

impl StyleCacheEntryKey {
    pub fn new(states: TransitionStates, font: Font) -> Self {
        StyleCacheEntryKey { states, font }
    }
}

/// A resolved value and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct CalculatedValue {
    /// `None` if the declaration was `null`.
    pub value: Option<StyleValue>,
    /// `None` only for values that did not come from a style.
    pub origin: Option<StyleOrigin>,
    /// Whether the value was computed from font-relative sizes. Such a value
    /// must not be used as the reference for other font-relative sizes.
    pub relative: bool,
}

impl CalculatedValue {
    pub fn new(value: Option<StyleValue>, origin: Option<StyleOrigin>, relative: bool) -> Self {
        CalculatedValue {
            value,
            origin,
            relative,
        }
    }

    pub fn font(&self) -> Option<&Font> {
        self.value.as_ref().and_then(StyleValue::as_font)
    }
}

/// The outcome of resolving a property.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupResult {
    /// No style applies: leave the property alone.
    Skip,
    Value(CalculatedValue),
}

impl LookupResult {
    pub fn is_skip(&self) -> bool {
        matches!(*self, LookupResult::Skip)
    }

    pub fn into_value(self) -> Option<CalculatedValue> {
        match self {
            LookupResult::Skip => None,
            LookupResult::Value(value) => Some(value),
        }
    }
}

/// All the entries for one chain of style maps.
#[derive(Debug, Default)]
pub struct StyleCache {
    entries: RwLock<FxHashMap<StyleCacheEntryKey, Arc<StyleCacheEntry>>>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_cache_entry(&self, key: &StyleCacheEntryKey) -> Option<Arc<StyleCacheEntry>> {
        self.entries.read().get(key).cloned()
    }

    /// Returns the entry for `key`, and whether it already existed.
    pub fn get_or_create_entry(&self, key: StyleCacheEntryKey) -> (Arc<StyleCacheEntry>, bool) {
        if let Some(entry) = self.style_cache_entry(&key) {
            return (entry, true);
        }
        let mut entries = self.entries.write();
        let mut existed = true;
        let entry = entries
            .entry(key)
            .or_insert_with(|| {
                existed = false;
                Arc::new(StyleCacheEntry::default())
            })
            .clone();
        (entry, existed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computed values by property name.
#[derive(Debug, Default)]
pub struct StyleCacheEntry {
    values: RwLock<FxHashMap<Atom, Arc<CalculatedValue>>>,
}

impl StyleCacheEntry {
    pub fn get(&self, property: &Atom) -> Option<Arc<CalculatedValue>> {
        self.values.read().get(property).cloned()
    }

    pub fn put(&self, property: Atom, value: Arc<CalculatedValue>) {
        self.values.write().insert(property, value);
    }

    /// Forget the value of `property`, so that it is resolved again on the
    /// next pass.
    pub fn remove(&self, property: &Atom) {
        self.values.write().remove(property);
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
