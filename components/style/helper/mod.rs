/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Per-node style state, and the driver that resolves and applies the
//! styleable properties of a node.

use crate::Atom;
use crate::FONT_PROPERTY;
use crate::cache::{
    CalculatedValue, LookupResult, StyleCache, StyleCacheEntry, StyleCacheEntryKey, StyleCacheKey,
    TransitionStates,
};
use crate::context::{CssFlags, SharedStyleContext};
use crate::dom::{Styleable, StyleableProperty};
use crate::error_reporting::{StyleError, StyleErrorKind};
use crate::properties::CssMetaData;
use crate::pseudo_class::{PseudoClass, PseudoClassState};
use crate::style_map::{StyleMap, StyleMapId, StyleMatcher};
use crate::stylesheets::{Style, StyleOrigin};
use crate::values::StyleValue;
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::error::Error;
use std::iter;
use std::mem;
use std::sync::Arc;

mod font;
mod lookup;
mod matching;

/// The styles that contributed to a value, collected while resolving it
/// when someone is observing them.
pub(crate) type StyleList = Option<Vec<Arc<Style>>>;

/// Style state attached to a node that CSS can affect.
#[derive(Debug, Default)]
pub struct StyleHelper {
    /// The pseudo-classes of this node that, when they change, require this
    /// node or one of its descendants to be resolved again.
    ///
    /// For example, with `.button:hover .label { ... }` the helper of the
    /// button has `hover` in its trigger states, even though no style of the
    /// button itself depends on it.
    trigger_states: PseudoClassState,

    /// `None` for helpers that only exist to hold trigger states for
    /// descendants, and for helpers whose caches were invalidated.
    cache_container: Option<CacheContainer>,

    /// The styles that contributed to each property the last time it was
    /// resolved, while someone is observing them.
    observable_style_map: Option<RefCell<FxHashMap<Atom, Vec<Arc<Style>>>>>,
}

#[derive(Debug)]
struct CacheContainer {
    /// The styles that apply to this node.
    style_map: Arc<StyleMap>,

    /// The context generation this container was built in.
    generation: u32,

    /// Finds the shared cache of this node.
    style_cache_key: StyleCacheKey,

    /// The font property of the node, if it has one.
    font_prop: Option<Arc<CssMetaData>>,

    /// Font for relative sizes, by transition states and default font.
    /// Resolving a font needs a font, so this is computed first.
    font_size_cache: RefCell<FxHashMap<StyleCacheEntryKey, CalculatedValue>>,

    /// The properties this helper has set, with the value and origin they
    /// had before, so they can be reset when no style applies anymore.
    css_set_properties: RefCell<FxHashMap<Atom, (Arc<CssMetaData>, CalculatedValue)>>,
}

impl CacheContainer {
    fn new<E: Styleable>(context: &SharedStyleContext, node: E, style_map: Arc<StyleMap>) -> Self {
        let mut style_cache_key = StyleCacheKey::new();
        style_cache_key.push(style_map.id());

        // Ancestors without styles do not affect which style is selected, so
        // only those that have some are part of the key.
        let mut parent = node.styleable_parent();
        while let Some(current) = parent {
            if let Some(helper) = current.style_helper() {
                if let Some(ref container) = helper.cache_container {
                    style_cache_key.push(container.style_map.id());
                }
            }
            parent = current.styleable_parent();
        }

        let font_prop = node
            .css_meta_data()
            .iter()
            .find(|meta| &**meta.property() == FONT_PROPERTY)
            .cloned();

        CacheContainer {
            style_map,
            generation: context.generation(),
            style_cache_key,
            font_prop,
            font_size_cache: RefCell::new(FxHashMap::default()),
            css_set_properties: RefCell::new(FxHashMap::default()),
        }
    }
}

impl StyleHelper {
    fn new() -> Self {
        Self::default()
    }

    /// Match `node` and build its style helper, or return `None` when no
    /// style can affect it.
    ///
    /// Properties set through the node's previous helper are reset to their
    /// initial values either way.
    pub fn create<E, M>(context: &SharedStyleContext, matcher: &M, node: E) -> Option<StyleHelper>
    where
        E: Styleable,
        M: StyleMatcher<E> + ?Sized,
    {
        let depth = iter::successors(Some(node), |n| n.styleable_parent()).count();

        // Which pseudo-classes of the node and of its ancestors the matched
        // selectors depend on, from the node up.
        let mut trigger_states = vec![PseudoClassState::new(); depth];
        let style_map = matcher.find_matching_styles(context, node, &mut trigger_states);

        if style_map.as_ref().is_none_or(|map| map.is_empty()) {
            let might_inherit = node.css_meta_data().iter().any(|meta| meta.inherits());
            if !might_inherit {
                if let Some(previous) = node.style_helper() {
                    previous.reset_to_initial_values(context, node);
                }
                debug!("No styles apply to {:?}", node);
                return None;
            }
        }

        let style_map = style_map.unwrap_or_else(|| Arc::new(StyleMap::empty(StyleMapId::EMPTY)));

        let mut helper = StyleHelper::new();
        if let Some(states) = trigger_states.first() {
            helper.trigger_states.union_with(states);
        }

        // Make sure ancestors know which of their pseudo-classes matter to
        // this node, creating a helper to hold them if needed.
        let mut parent = node.styleable_parent();
        for states in trigger_states.iter().skip(1) {
            let current = match parent {
                Some(current) => current,
                None => break,
            };
            if !states.is_empty() {
                if !current.has_style_helper() {
                    current.set_style_helper(Some(StyleHelper::new()));
                }
                if let Some(mut ancestor_helper) = current.style_helper_mut() {
                    ancestor_helper.trigger_states.union_with(states);
                }
            }
            parent = current.styleable_parent();
        }

        helper.cache_container = Some(CacheContainer::new(context, node, style_map));

        // The style map may now be different.
        if let Some(previous) = node.style_helper() {
            previous.reset_to_initial_values(context, node);
        }

        debug!(
            "Created style helper for {:?}, trigger states {}",
            node, helper.trigger_states
        );
        Some(helper)
    }

    /// Whether a change of `pseudo_class` requires the node, or one of its
    /// descendants, to be resolved again.
    pub fn affects_node(&self, pseudo_class: &PseudoClass) -> bool {
        self.trigger_states.contains(pseudo_class)
    }

    pub fn trigger_states(&self) -> &PseudoClassState {
        &self.trigger_states
    }

    /// Whether styles apply to the node through this helper.
    pub fn has_styles(&self) -> bool {
        self.cache_container.is_some()
    }

    /// The key of the shared cache of the node.
    pub fn style_cache_key(&self) -> Option<&StyleCacheKey> {
        self.cache_container
            .as_ref()
            .map(|container| &container.style_cache_key)
    }

    /// The styles that apply to the node.
    pub fn style_map(&self) -> Option<&Arc<StyleMap>> {
        self.cache_container
            .as_ref()
            .map(|container| &container.style_map)
    }

    /// Start or stop recording which styles contribute to each property.
    /// While recording, cached values are not trusted.
    pub fn set_observing_styles(&mut self, observing: bool) {
        if !observing {
            self.observable_style_map = None;
        } else if self.observable_style_map.is_none() {
            self.observable_style_map = Some(RefCell::new(FxHashMap::default()));
        }
    }

    /// The styles that contributed to `property` the last time it was set.
    pub fn observed_styles(&self, property: &str) -> Option<Vec<Arc<Style>>> {
        let map = self.observable_style_map.as_ref()?;
        let styles = map.borrow().get(&Atom::from(property)).cloned();
        styles
    }

    /// For `node` and each of its ancestors that has a style helper, from
    /// the node up, the pseudo-classes it is in that its helper cares about.
    pub fn transition_states<E: Styleable>(node: E) -> TransitionStates {
        let mut states = TransitionStates::new();
        let mut current = Some(node);
        while let Some(styleable) = current {
            if let Some(helper) = styleable.style_helper() {
                states.push(
                    styleable
                        .pseudo_class_states()
                        .intersection(&helper.trigger_states),
                );
            }
            current = styleable.styleable_parent();
        }
        states
    }

    /// The shared cache entry the node currently resolves against, if it has
    /// been created.
    pub fn cache_entry<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
    ) -> Option<Arc<StyleCacheEntry>> {
        let container = self.cache_container.as_ref()?;
        let cache = context.shared_cache(&container.style_cache_key, container.generation)?;
        let states = StyleHelper::transition_states(node);
        let font_key = StyleCacheEntryKey::new(states.clone(), context.default_font().clone());
        let font = container
            .font_size_cache
            .borrow()
            .get(&font_key)?
            .font()?
            .clone();
        cache.style_cache_entry(&StyleCacheEntryKey::new(states, font))
    }

    /// Resolve every styleable property of `node` in its current state and
    /// apply the result.
    pub fn transition_to_state<E: Styleable>(
        context: &SharedStyleContext,
        node: E,
        flags: CssFlags,
    ) {
        let shared_cache = {
            let helper = match node.style_helper() {
                Some(helper) => helper,
                None => return,
            };
            let container = match helper.cache_container {
                Some(ref container) => container,
                // CSS does not apply to this node.
                None => return,
            };
            let cache = context.shared_cache(&container.style_cache_key, container.generation);
            if cache.is_none() {
                helper.reset_to_initial_values(context, node);
            }
            cache
        };

        let shared_cache = match shared_cache {
            Some(cache) => cache,
            None => {
                debug!("Style cache of {:?} was invalidated", node);
                if let Some(mut helper) = node.style_helper_mut() {
                    helper.cache_container = None;
                }
                node.request_css_reapply();
                return;
            },
        };

        if let Some(helper) = node.style_helper() {
            helper.apply_styles(context, node, flags, &shared_cache);
        }
    }

    fn apply_styles<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
        flags: CssFlags,
        shared_cache: &StyleCache,
    ) {
        let container = match self.cache_container {
            Some(ref container) => container,
            None => return,
        };

        let transition_states = StyleHelper::transition_states(node);

        let font_cache_key =
            StyleCacheEntryKey::new(transition_states.clone(), context.default_font().clone());
        let cached_font = container.font_size_cache.borrow().get(&font_cache_key).cloned();
        let cached_font = match cached_font {
            Some(font) => font,
            None => {
                let font = self
                    .lookup_font(context, node, FONT_PROPERTY, None, &mut None)
                    .into_value()
                    .or_else(|| StyleHelper::cached_font(context, node.styleable_parent()))
                    .unwrap_or_else(|| {
                        CalculatedValue::new(
                            Some(StyleValue::Font(context.default_font().clone())),
                            None,
                            false,
                        )
                    });
                container
                    .font_size_cache
                    .borrow_mut()
                    .insert(font_cache_key, font.clone());
                font
            },
        };

        let font_for_relative_sizes = cached_font
            .font()
            .cloned()
            .unwrap_or_else(|| context.default_font().clone());
        let cache_entry_key = StyleCacheEntryKey::new(transition_states.clone(), font_for_relative_sizes);
        let (cache_entry, existed) = shared_cache.get_or_create_entry(cache_entry_key);

        // If no one is observing styles and the entry already exists, it can
        // be trusted.
        let observing = self.observable_style_map.is_some();
        let fast_path = existed && !observing && context.prefs.use_fast_path;

        let node_states = transition_states.first().cloned().unwrap_or_default();

        for meta in node.css_meta_data().iter() {
            let property = meta.property();

            if let Some(ref observed) = self.observable_style_map {
                observed.borrow_mut().remove(property);
            }

            // Usually because the property is bound.
            if !meta.is_settable(node) {
                continue;
            }

            let cached = cache_entry.get(property);

            // A value missing from a trusted entry would reset the property;
            // on reapply, resolve it instead.
            let force_slow_path = fast_path && cached.is_none() && flags == CssFlags::Reapply;

            let mut styles: StyleList = if observing { Some(Vec::new()) } else { None };
            let mut add_to_cache = false;
            let calculated = if fast_path && !force_slow_path {
                cached
            } else if cached.is_some() && !observing {
                cached
            } else {
                match self.lookup(
                    context,
                    node,
                    meta,
                    &node_states,
                    node,
                    Some(&cached_font),
                    &mut styles,
                ) {
                    LookupResult::Skip => None,
                    LookupResult::Value(value) => {
                        add_to_cache = cached.is_none();
                        Some(Arc::new(value))
                    },
                }
            };

            let result = self.apply_calculated_value(
                context,
                node,
                meta,
                calculated,
                add_to_cache.then_some(&*cache_entry),
                styles,
            );

            if let Err(error) = result {
                // Do not try this value again until the node is reapplied.
                cache_entry.remove(property);
                context.report_error(StyleError::new(
                    StyleErrorKind::Apply(error),
                    format!("{:?}", node),
                    property.clone(),
                    None,
                ));
            }
        }
    }

    fn apply_calculated_value<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
        meta: &Arc<CssMetaData>,
        calculated: Option<Arc<CalculatedValue>>,
        cache_entry: Option<&StyleCacheEntry>,
        styles: StyleList,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let container = match self.cache_container {
            Some(ref container) => container,
            None => return Ok(()),
        };
        let property = meta.property();

        let calculated = match calculated {
            Some(calculated) => calculated,
            None => {
                // No style applies in this state. If CSS set the property in
                // a previous state, put back what was there before.
                let initial = container
                    .css_set_properties
                    .borrow()
                    .get(property)
                    .map(|(_, initial)| initial.clone());
                if let Some(initial) = initial {
                    if let Some(styleable_property) = node.styleable_property(meta) {
                        styleable_property.apply_style(initial.origin, initial.value)?;
                    }
                }
                return Ok(());
            },
        };

        if let Some(cache_entry) = cache_entry {
            cache_entry.put(property.clone(), calculated.clone());
        }

        let styleable_property = match node.styleable_property(meta) {
            Some(styleable_property) => styleable_property,
            None => return Ok(()),
        };

        let origin = match calculated.origin {
            Some(origin) => origin,
            None => return Ok(()),
        };
        let current_origin = styleable_property.style_origin();

        // A style from the user agent stylesheet never overrides a value set
        // by the user.
        if current_origin == Some(StyleOrigin::User) && origin == StyleOrigin::UserAgent {
            return Ok(());
        }

        let current_value = styleable_property.value();
        if current_origin != Some(origin) || current_value != calculated.value {
            if context.prefs.log_applied_styles {
                trace!(
                    "{:?}: applying {} = {:?} from {:?}",
                    node, property, calculated.value, origin
                );
            }

            styleable_property.apply_style(Some(origin), calculated.value.clone())?;

            container
                .css_set_properties
                .borrow_mut()
                .entry(property.clone())
                .or_insert_with(|| {
                    (
                        meta.clone(),
                        CalculatedValue::new(current_value, current_origin, false),
                    )
                });
        }

        if let Some(ref observed) = self.observable_style_map {
            observed
                .borrow_mut()
                .insert(property.clone(), styles.unwrap_or_default());
        }
        Ok(())
    }

    /// Put back the values the properties set by this helper had before CSS
    /// set them. Values set by the user since are left alone.
    pub fn reset_to_initial_values<E: Styleable>(&self, context: &SharedStyleContext, node: E) {
        let container = match self.cache_container {
            Some(ref container) => container,
            None => return,
        };

        // Take everything out first, so that properties set while resetting
        // are tracked afresh.
        let css_set_properties = mem::take(&mut *container.css_set_properties.borrow_mut());

        for (property, (meta, initial)) in css_set_properties {
            let styleable_property = match node.styleable_property(&meta) {
                Some(styleable_property) => styleable_property,
                None => continue,
            };
            let origin = styleable_property.style_origin();
            if origin.is_none() || origin == Some(StyleOrigin::User) {
                continue;
            }
            if let Err(error) = styleable_property.apply_style(initial.origin, initial.value) {
                context.report_error(StyleError::new(
                    StyleErrorKind::Apply(error),
                    format!("{:?}", node),
                    property,
                    None,
                ));
            }
        }
    }
}
