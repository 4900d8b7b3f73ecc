/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Which styles could contribute to a property, whatever the state of the
//! node. Used by tools that show where a value comes from.

use super::StyleHelper;
use crate::dom::Styleable;
use crate::properties::CssMetaData;
use crate::stylesheets::{CascadingStyle, Style};
use crate::values::{ParsedValue, Value};
use std::sync::Arc;

impl StyleHelper {
    /// Every style that could contribute to `meta` on `node`, best first.
    pub fn matching_styles<E: Styleable>(&self, node: E, meta: &CssMetaData) -> Vec<Arc<Style>> {
        let mut candidates = Vec::new();
        self.collect_matching_styles(node, meta, &mut candidates);
        for sub_property in meta.sub_properties() {
            self.collect_matching_styles(node, sub_property, &mut candidates);
        }

        candidates.sort_by(|a, b| b.cmp_precedence(a));

        let mut styles: Vec<Arc<Style>> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !styles.iter().any(|style| Arc::ptr_eq(style, &candidate.style)) {
                styles.push(candidate.style);
            }
        }
        styles
    }

    fn collect_matching_styles<E: Styleable>(
        &self,
        node: E,
        meta: &CssMetaData,
        candidates: &mut Vec<CascadingStyle>,
    ) {
        let container = match self.cache_container {
            Some(ref container) => container,
            None => return,
        };

        for style in container.style_map.cascading_styles(meta.property()) {
            if push_candidate(candidates, style) {
                collect_lookup_styles(node, style.value(), candidates);
            }
        }

        if !meta.inherits() {
            return;
        }

        let mut parent = node.styleable_parent();
        while let Some(current) = parent {
            if let Some(helper) = current.style_helper() {
                if let Some(ref container) = helper.cache_container {
                    for style in container.style_map.cascading_styles(meta.property()) {
                        if push_candidate(candidates, style) {
                            collect_lookup_styles(current, style.value(), candidates);
                        }
                    }
                }
            }
            parent = current.styleable_parent();
        }
    }
}

/// Add the styles that the lookups in `value` may refer to, from `node` up.
fn collect_lookup_styles<E: Styleable>(
    node: E,
    value: &ParsedValue,
    candidates: &mut Vec<CascadingStyle>,
) {
    if !value.contains_lookups() {
        return;
    }

    let name = match *value.value() {
        Value::Lookup(ref name) => name,
        Value::Sequence(ref values) => {
            for value in values {
                collect_lookup_styles(node, value, candidates);
            }
            return;
        },
        Value::Layers(ref layers) => {
            for value in layers.iter().flat_map(|layer| layer.iter()) {
                collect_lookup_styles(node, value, candidates);
            }
            return;
        },
        _ => return,
    };

    let mut current = Some(node);
    while let Some(styleable) = current {
        let found: Vec<CascadingStyle> = match styleable.style_helper() {
            Some(helper) => match helper.cache_container {
                Some(ref container) => container
                    .style_map
                    .cascading_styles(name)
                    .iter()
                    .filter(|style| push_candidate(candidates, style))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        // Only styles seen for the first time are followed, which also
        // stops on cycles.
        for style in found {
            collect_lookup_styles(styleable, style.value(), candidates);
        }
        current = styleable.styleable_parent();
    }
}

/// Returns whether `style` was not a candidate yet.
fn push_candidate(candidates: &mut Vec<CascadingStyle>, style: &CascadingStyle) -> bool {
    if candidates.iter().any(|candidate| candidate.same_style(style)) {
        return false;
    }
    candidates.push(style.clone());
    true
}
