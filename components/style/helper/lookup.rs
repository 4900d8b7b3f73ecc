/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Resolution of the value of one property of one node through the cascade,
//! inheritance and lookups.

use super::{StyleHelper, StyleList};
use crate::Atom;
use crate::cache::{CalculatedValue, LookupResult};
use crate::context::SharedStyleContext;
use crate::converters::StyleConverter;
use crate::dom::{Styleable, StyleableProperty};
use crate::error_reporting::{StyleError, StyleErrorKind};
use crate::properties::CssMetaData;
use crate::pseudo_class::PseudoClassState;
use crate::stylesheets::{CascadingStyle, StyleOrigin};
use crate::values::{Font, ParsedValue, Value};
use std::sync::Arc;

impl StyleHelper {
    /// The style for `property` that wins the cascade on `node` in `states`.
    pub(super) fn get_style<E: Styleable>(
        &self,
        node: E,
        property: &str,
        states: &PseudoClassState,
    ) -> Option<CascadingStyle> {
        let container = self.cache_container.as_ref()?;
        container
            .style_map
            .cascading_styles(property)
            .iter()
            .find(|style| style.selector().state_matches(node, states))
            .cloned()
    }

    /// `get_style` through the helper attached to `node`, if any.
    pub(super) fn style_of<E: Styleable>(
        node: E,
        property: &str,
        states: &PseudoClassState,
    ) -> Option<CascadingStyle> {
        let helper = node.style_helper()?;
        helper.get_style(node, property, states)
    }

    /// Resolve `meta` on `node` in `states`.
    ///
    /// `originating` is the node the resolution was started for, which
    /// differs from `node` when resolving a sub-property. `cached_font` is
    /// the font to use for font-relative sizes.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn lookup<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
        meta: &CssMetaData,
        states: &PseudoClassState,
        originating: E,
        cached_font: Option<&CalculatedValue>,
        styles: &mut StyleList,
    ) -> LookupResult {
        if meta.is_font() {
            return self.lookup_font(context, node, meta.property(), cached_font, styles);
        }

        let property = meta.property();
        let style = match self.get_style(node, property, states) {
            Some(style) => style,
            None if meta.sub_properties().is_empty() => {
                return self.handle_no_style_found(context, node, meta, originating, cached_font, styles);
            },
            None => {
                return self.lookup_sub_properties(
                    context,
                    node,
                    meta,
                    states,
                    originating,
                    cached_font,
                    styles,
                );
            },
        };

        // A style from the user agent stylesheet never overrides a value set
        // by the user. Sub-properties have no styleable property of their
        // own.
        if style.origin() == StyleOrigin::UserAgent {
            let user_set = originating
                .styleable_property(meta)
                .is_some_and(|p| p.style_origin() == Some(StyleOrigin::User));
            if user_set {
                return LookupResult::Skip;
            }
        }

        let style = if style.value().is_inherit() {
            push_style(styles, &style);
            match StyleHelper::get_inherited_style(node, property) {
                Some(inherited) => inherited,
                None => return LookupResult::Skip,
            }
        } else {
            style
        };

        push_style(styles, &style);

        self.calculate_value(
            context,
            &style,
            node,
            property,
            meta.converter(),
            states,
            cached_font,
            styles,
        )
    }

    /// No style for `meta` itself, but there may be some for its
    /// sub-properties, from which a value can be composed.
    #[allow(clippy::too_many_arguments)]
    fn lookup_sub_properties<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
        meta: &CssMetaData,
        states: &PseudoClassState,
        originating: E,
        cached_font: Option<&CalculatedValue>,
        styles: &mut StyleList,
    ) -> LookupResult {
        let mut values = Vec::with_capacity(meta.sub_properties().len());
        let mut origin: Option<StyleOrigin> = None;
        let mut relative = false;

        for sub_property in meta.sub_properties() {
            let constituent = self.lookup(
                context,
                node,
                sub_property,
                states,
                originating,
                cached_font,
                styles,
            );
            if let LookupResult::Value(constituent) = constituent {
                // The origin of the composite is the highest of its parts.
                origin = origin.max(constituent.origin);
                relative |= constituent.relative;
                values.push((sub_property.property().clone(), constituent.value));
            }
        }

        if values.is_empty() {
            return self.handle_no_style_found(context, node, meta, originating, cached_font, styles);
        }

        let font = reference_font(context, cached_font);
        match meta.converter().convert_sub_properties(&values, &font) {
            Ok(value) => LookupResult::Value(CalculatedValue::new(Some(value), origin, relative)),
            Err(error) => {
                context.report_error(StyleError::new(
                    StyleErrorKind::Conversion(error),
                    format!("{:?}", node),
                    meta.property().clone(),
                    None,
                ));
                LookupResult::Skip
            },
        }
    }

    /// No style applies: inherit if the property does, unless the user set
    /// it.
    fn handle_no_style_found<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
        meta: &CssMetaData,
        originating: E,
        cached_font: Option<&CalculatedValue>,
        styles: &mut StyleList,
    ) -> LookupResult {
        if !meta.inherits() {
            return LookupResult::Skip;
        }

        let user_set = originating
            .styleable_property(meta)
            .is_some_and(|p| p.style_origin() == Some(StyleOrigin::User));
        if user_set {
            return LookupResult::Skip;
        }

        let style = match StyleHelper::get_inherited_style(node, meta.property()) {
            Some(style) => style,
            None => return LookupResult::Skip,
        };
        push_style(styles, &style);

        self.calculate_value(
            context,
            &style,
            node,
            meta.property(),
            meta.converter(),
            &node.pseudo_class_states(),
            cached_font,
            styles,
        )
    }

    /// The style for `property` of the nearest ancestor that has one, other
    /// than `inherit`.
    pub(super) fn get_inherited_style<E: Styleable>(
        node: E,
        property: &str,
    ) -> Option<CascadingStyle> {
        let mut parent = node.styleable_parent();
        while let Some(current) = parent {
            let style = StyleHelper::style_of(current, property, &current.pseudo_class_states());
            if let Some(style) = style {
                if !style.value().is_inherit() {
                    return Some(style);
                }
            }
            parent = current.styleable_parent();
        }
        None
    }

    /// Find the style a lookup of `property` refers to: on `node` in
    /// `states`, then on `node` regardless of state, then on the nearest
    /// ancestor with a style helper, and so on up.
    fn resolve_ref<E: Styleable>(
        node: E,
        property: &str,
        states: &PseudoClassState,
    ) -> Option<CascadingStyle> {
        if let Some(style) = StyleHelper::style_of(node, property, states) {
            return Some(style);
        }

        if !states.is_empty() {
            return StyleHelper::resolve_ref(node, property, &PseudoClassState::new());
        }

        let mut parent = node.styleable_parent();
        while let Some(current) = parent {
            if current.has_style_helper() {
                return StyleHelper::resolve_ref(current, property, &current.pseudo_class_states());
            }
            parent = current.styleable_parent();
        }
        None
    }

    /// Replace the lookups in `value` with the values they refer to.
    ///
    /// `whence` is raised to the highest origin of the styles lookups
    /// resolve to: a value that depends on an inline style must not be
    /// treated as coming from a stylesheet. `resolving` holds the values
    /// lookups expanded to and that are still being resolved, to detect
    /// cycles, including those through function arguments.
    fn resolve_lookups<E: Styleable>(
        node: E,
        value: &Arc<ParsedValue>,
        states: &PseudoClassState,
        whence: &mut StyleOrigin,
        resolving: &mut Vec<Arc<ParsedValue>>,
        styles: &mut StyleList,
    ) -> Result<Arc<ParsedValue>, StyleErrorKind> {
        if let Some(name) = value.lookup_name() {
            let resolved = match StyleHelper::resolve_ref(node, name, states) {
                Some(resolved) => resolved,
                // Left for the converter to fail on.
                None => return Ok(value.clone()),
            };

            if resolving.iter().any(|v| Arc::ptr_eq(v, resolved.value())) {
                return Err(StyleErrorKind::LookupCycle {
                    lookup: name.clone(),
                    selector: resolved.selector().to_string(),
                });
            }

            push_style(styles, &resolved);

            if resolved.origin() > *whence {
                *whence = resolved.origin();
            }

            // The value looked up may itself contain lookups.
            resolving.push(resolved.value().clone());
            let result =
                StyleHelper::resolve_lookups(node, resolved.value(), states, whence, resolving, styles);
            resolving.pop();
            return result;
        }

        if !value.contains_lookups() {
            return Ok(value.clone());
        }

        let resolved = match *value.value() {
            Value::Sequence(ref values) => Value::Sequence(
                values
                    .iter()
                    .map(|v| StyleHelper::resolve_lookups(node, v, states, whence, resolving, styles))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Value::Layers(ref layers) => Value::Layers(
                layers
                    .iter()
                    .map(|layer| {
                        layer
                            .iter()
                            .map(|v| {
                                StyleHelper::resolve_lookups(node, v, states, whence, resolving, styles)
                            })
                            .collect::<Result<Vec<_>, _>>()
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => return Ok(value.clone()),
        };
        Ok(Arc::new(value.rebuild(resolved)))
    }

    /// Compute the value of `style` for `property` on `node`. Errors are
    /// reported and resolve to `Skip`.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn calculate_value<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        style: &CascadingStyle,
        node: E,
        property: &Atom,
        converter: StyleConverter,
        states: &PseudoClassState,
        cached_font: Option<&CalculatedValue>,
        styles: &mut StyleList,
    ) -> LookupResult {
        if style.value().is_null() {
            return LookupResult::Value(CalculatedValue::new(None, Some(style.origin()), false));
        }

        match StyleHelper::compute_value(context, style, node, converter, states, cached_font, styles) {
            Ok(value) => LookupResult::Value(value),
            Err(kind) => {
                context.report_error(StyleError::new(
                    kind,
                    format!("{:?}", node),
                    property.clone(),
                    Some(&style.style),
                ));
                LookupResult::Skip
            },
        }
    }

    fn compute_value<E: Styleable>(
        context: &SharedStyleContext,
        style: &CascadingStyle,
        node: E,
        converter: StyleConverter,
        states: &PseudoClassState,
        cached_font: Option<&CalculatedValue>,
        styles: &mut StyleList,
    ) -> Result<CalculatedValue, StyleErrorKind> {
        let mut whence = style.origin();
        let mut resolving = Vec::new();
        let resolved =
            StyleHelper::resolve_lookups(node, style.value(), states, &mut whence, &mut resolving, styles)?;

        let is_font_property = converter.is_font_converter();
        let relative = resolved.contains_font_relative_size(is_font_property);

        let font = StyleHelper::font_for_relative_sizes(
            context,
            node,
            relative && is_font_property,
            cached_font,
        );

        let value = resolved
            .convert_with(converter, &font)
            .map_err(|error| match resolved.first_lookup() {
                Some(name) => StyleErrorKind::UnresolvedReference(name.clone()),
                None => StyleErrorKind::from(error),
            })?;
        Ok(CalculatedValue::new(Some(value), Some(whence), relative))
    }

    /// The font relative sizes of `node` are taken of.
    ///
    /// A font computed from a relative size must not be the reference for
    /// that same relative size again: with `-fx-font-size: 1.5em` and a
    /// default size of 13px, the cached font is 19.5px, and converting
    /// `1.5em` against it would give 29.25px. In that case the nearest
    /// ancestor font that did not come from the same relative size is used.
    fn font_for_relative_sizes<E: Styleable>(
        context: &SharedStyleContext,
        node: E,
        relative_font_size: bool,
        cached_font: Option<&CalculatedValue>,
    ) -> Font {
        if relative_font_size && cached_font.is_none_or(|font| font.relative) {
            let mut childs_font = cached_font.cloned();
            let mut current = Some(node);
            while let Some(styleable) = current {
                if let Some(parents_font) = StyleHelper::cached_font(context, styleable.styleable_parent()) {
                    let base = if !parents_font.relative {
                        parents_font.font().cloned()
                    } else if childs_font.as_ref().is_none_or(|font| *font == parents_font) {
                        // Same style, keep looking.
                        childs_font = Some(parents_font);
                        None
                    } else {
                        parents_font.font().cloned()
                    };
                    if let Some(base) = base {
                        return base;
                    }
                }
                current = styleable.styleable_parent();
            }
        }

        match cached_font {
            Some(font) if !font.relative => font
                .font()
                .cloned()
                .unwrap_or_else(|| context.default_font().clone()),
            _ => context.default_font().clone(),
        }
    }
}

/// The font to compose values with when no style gives one.
pub(super) fn reference_font(context: &SharedStyleContext, cached_font: Option<&CalculatedValue>) -> Font {
    cached_font
        .and_then(CalculatedValue::font)
        .cloned()
        .unwrap_or_else(|| context.default_font().clone())
}

pub(super) fn push_style(styles: &mut StyleList, style: &CascadingStyle) {
    if let Some(ref mut list) = *styles {
        if !list.iter().any(|s| Arc::ptr_eq(s, &style.style)) {
            list.push(style.style.clone());
        }
    }
}
