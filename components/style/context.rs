/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The context shared by every style resolution pass.

use crate::cache::{StyleCache, StyleCacheKey};
use crate::dom::Styleable;
use crate::error_reporting::{StyleError, StyleErrorReporter};
use crate::helper::StyleHelper;
use crate::style_map::{StyleMapId, StyleMatcher};
use crate::values::Font;
use log::debug;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use style_config::Preferences;

/// What a node needs from the next style pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CssFlags {
    /// Styles are up to date.
    Clean,
    /// The pseudo-class state changed: resolve again with the same styles.
    Update,
    /// The styles that apply may have changed: match again, then resolve.
    Reapply,
}

/// State shared by all the nodes being styled, created once by the toolkit
/// and passed to every resolution entry point.
pub struct SharedStyleContext {
    /// The preferences of the engine.
    pub prefs: Preferences,

    /// The font used when no ancestor provides one.
    default_font: Font,

    /// The reporter for errors found while resolving styles.
    pub error_reporter: Box<dyn StyleErrorReporter>,

    /// Computed value caches, by chain of style maps.
    shared_caches: RwLock<FxHashMap<StyleCacheKey, Arc<StyleCache>>>,

    /// Starts at zero, and increased by one every time the caches are
    /// invalidated. This can be used to easily check for stale helpers.
    generation: AtomicU32,

    next_style_map_id: AtomicU32,
}

impl SharedStyleContext {
    pub fn new(prefs: Preferences, error_reporter: Box<dyn StyleErrorReporter>) -> Self {
        let prefs = prefs.validated();
        let default_font = Font::plain(&prefs.default_font_family, prefs.default_font_size);
        SharedStyleContext {
            prefs,
            default_font,
            error_reporter,
            shared_caches: RwLock::new(FxHashMap::default()),
            generation: AtomicU32::new(0),
            next_style_map_id: AtomicU32::new(0),
        }
    }

    pub fn default_font(&self) -> &Font {
        &self.default_font
    }

    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }

    /// A fresh id for a style map built by a matcher.
    pub fn allocate_style_map_id(&self) -> StyleMapId {
        StyleMapId(self.next_style_map_id.fetch_add(1, Ordering::Relaxed))
    }

    /// The cache for `key`, created if needed, or `None` if the caches were
    /// invalidated since `generation`.
    pub fn shared_cache(&self, key: &StyleCacheKey, generation: u32) -> Option<Arc<StyleCache>> {
        if generation != self.generation() {
            return None;
        }
        if let Some(cache) = self.shared_caches.read().get(key) {
            return Some(cache.clone());
        }
        let mut caches = self.shared_caches.write();
        // Invalidation takes the write lock too.
        if generation != self.generation() {
            return None;
        }
        let cache = caches.entry(key.clone()).or_insert_with(|| {
            debug!("Creating style cache for {:?}", key);
            Arc::new(StyleCache::new())
        });
        Some(cache.clone())
    }

    /// Drop every cached value, for example because the set of stylesheets
    /// changed. Style helpers built before this call notice it on their next
    /// pass and ask their node to be styled from scratch.
    pub fn invalidate(&self) {
        let mut caches = self.shared_caches.write();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            "Invalidating {} style caches, generation is now {}",
            caches.len(),
            generation
        );
        caches.clear();
    }

    /// The number of style caches currently alive.
    pub fn shared_cache_count(&self) -> usize {
        self.shared_caches.read().len()
    }

    pub fn report_error(&self, error: StyleError) {
        self.error_reporter.report_error(error);
    }

    /// Style `node`: build its style helper if needed, then resolve and
    /// apply its styleable properties.
    ///
    /// Ancestors are expected to have been processed before their
    /// descendants.
    pub fn process_css<E, M>(&self, matcher: &M, node: E, flags: CssFlags)
    where
        E: Styleable,
        M: StyleMatcher<E> + ?Sized,
    {
        if flags == CssFlags::Clean {
            return;
        }
        if flags == CssFlags::Reapply || !node.has_style_helper() {
            let helper = StyleHelper::create(self, matcher, node);
            node.set_style_helper(helper);
        }
        StyleHelper::transition_to_state(self, node, flags);
    }
}
