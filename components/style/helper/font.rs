/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Resolution of the font shorthand and its longhands.
//!
//! Fonts are inherited, made of several parts that may each be set by the
//! shorthand or by a longhand, and their size may be relative to the font
//! of the parent. One would expect the text below to be 16px Arial, which
//! the generic resolver, looking at longhands only when there is no
//! shorthand, would not give:
//!
//! ```css
//! .group { -fx-font: 12px Arial; }
//! .group .text { -fx-font-size: 16px; }
//! ```

use super::lookup::push_style;
use super::{StyleHelper, StyleList};
use crate::{Atom, FONT_PROPERTY};
use crate::cache::{CalculatedValue, LookupResult, StyleCacheEntryKey};
use crate::context::SharedStyleContext;
use crate::converters::StyleConverter;
use crate::dom::{Styleable, StyleableProperty};
use crate::pseudo_class::PseudoClassState;
use crate::stylesheets::{CascadingStyle, StyleOrigin};
use crate::values::{Font, StyleValue};

impl StyleHelper {
    /// Resolve the font `property` of `node`.
    ///
    /// Without a `cached_font`, this computes the font used for relative
    /// sizes: only the size matters, and the result is returned whatever its
    /// origin.
    pub(super) fn lookup_font<E: Styleable>(
        &self,
        context: &SharedStyleContext,
        node: E,
        property: &str,
        cached_font: Option<&CalculatedValue>,
        styles: &mut StyleList,
    ) -> LookupResult {
        let container = match self.cache_container {
            Some(ref container) => container,
            None => return LookupResult::Skip,
        };

        let mut origin: Option<StyleOrigin> = None;
        let mut distance = 0;

        // Each part found derives a new font from this one.
        let mut cv_font: Option<CalculatedValue> = cached_font.cloned();

        let states = node.pseudo_class_states();

        // A font set by the user takes precedence over anything inherited.
        if let Some(ref font_prop) = container.font_prop {
            if let Some(styleable_property) = node.styleable_property(font_prop) {
                if styleable_property.style_origin() == Some(StyleOrigin::User) {
                    origin = Some(StyleOrigin::User);
                    let font = styleable_property
                        .value()
                        .filter(|value| value.as_font().is_some())
                        .unwrap_or_else(|| StyleValue::Font(context.default_font().clone()));
                    cv_font = Some(CalculatedValue::new(Some(font), None, false));
                }
            }
        }
        let user_set_font = origin == Some(StyleOrigin::User);

        let mut shorthand = self.get_style(node, property, &states);

        if shorthand.is_none() && !user_set_font {
            let mut parent = node.styleable_parent();
            while let Some(current) = parent {
                let style = match current.style_helper() {
                    Some(helper) => {
                        distance += 1;
                        helper.get_style(current, property, &current.pseudo_class_states())
                    },
                    None => None,
                };
                if let Some(style) = style {
                    if !style.value().is_inherit() {
                        shorthand = Some(style);
                        break;
                    }
                }
                parent = current.styleable_parent();
            }
        }

        if let Some(ref shorthand) = shorthand {
            // On equal origins take the shorthand: the font property has not
            // been updated yet.
            if origin.is_none_or(|origin| origin <= shorthand.origin()) {
                let cv = self.calculate_value(
                    context,
                    shorthand,
                    node,
                    &Atom::from(property),
                    StyleConverter::Font,
                    &states,
                    cv_font.as_ref(),
                    styles,
                );
                if let LookupResult::Value(cv) = cv {
                    if cv.font().is_some() {
                        push_style(styles, shorthand);
                        origin = cv.origin;
                        cv_font = Some(cv);
                    }
                }
            }
        }

        let size = self.font_longhand(node, property, "-size", &states, user_set_font, distance);
        if let Some(size) = accepts_longhand(size, shorthand.as_ref(), origin) {
            let cv = self.calculate_value(
                context,
                &size,
                node,
                size.property(),
                StyleConverter::FontSize,
                &states,
                cv_font.as_ref(),
                styles,
            );
            if let LookupResult::Value(cv) = cv {
                if let Some(px) = cv.value.as_ref().and_then(StyleValue::as_number) {
                    push_style(styles, &size);
                    origin = cv.origin;
                    let relative = cv.relative || cv_font.as_ref().is_some_and(|font| font.relative);
                    let font = base_font(context, cv_font.as_ref()).with_size(px);
                    cv_font = Some(CalculatedValue::new(Some(StyleValue::Font(font)), origin, relative));
                }
            }
        }

        // For the font used for relative sizes, only the size matters.
        if cached_font.is_some() {
            let weight = self.font_longhand(node, property, "-weight", &states, user_set_font, distance);
            if let Some(weight) = accepts_longhand(weight, shorthand.as_ref(), origin) {
                let cv = self.calculate_value(
                    context,
                    &weight,
                    node,
                    weight.property(),
                    StyleConverter::FontWeight,
                    &states,
                    None,
                    &mut None,
                );
                if let LookupResult::Value(CalculatedValue {
                    value: Some(StyleValue::FontWeight(value)),
                    origin: weight_origin,
                    ..
                }) = cv
                {
                    push_style(styles, &weight);
                    origin = weight_origin;
                    cv_font = Some(derive_font(context, cv_font.as_ref(), origin, |font| {
                        font.with_weight(value)
                    }));
                }
            }

            let style = self.font_longhand(node, property, "-style", &states, user_set_font, distance);
            if let Some(style) = accepts_longhand(style, shorthand.as_ref(), origin) {
                let cv = self.calculate_value(
                    context,
                    &style,
                    node,
                    style.property(),
                    StyleConverter::FontStyle,
                    &states,
                    None,
                    &mut None,
                );
                if let LookupResult::Value(CalculatedValue {
                    value: Some(StyleValue::FontPosture(value)),
                    origin: style_origin,
                    ..
                }) = cv
                {
                    push_style(styles, &style);
                    origin = style_origin;
                    cv_font = Some(derive_font(context, cv_font.as_ref(), origin, |font| {
                        font.with_posture(value)
                    }));
                }
            }

            let family = self.font_longhand(node, property, "-family", &states, user_set_font, distance);
            if let Some(family) = accepts_longhand(family, shorthand.as_ref(), origin) {
                let cv = self.calculate_value(
                    context,
                    &family,
                    node,
                    family.property(),
                    StyleConverter::FontFamily,
                    &states,
                    None,
                    &mut None,
                );
                if let LookupResult::Value(CalculatedValue {
                    value: Some(StyleValue::String(value)),
                    origin: family_origin,
                    ..
                }) = cv
                {
                    push_style(styles, &family);
                    origin = family_origin;
                    cv_font = Some(derive_font(context, cv_font.as_ref(), origin, |font| {
                        font.with_family(&value)
                    }));
                }
            }
        }

        // With a cached font, only a font that came from a style is a
        // result; a font set by the user is left alone.
        match cv_font {
            Some(font) if cached_font.is_none() => LookupResult::Value(font),
            Some(font) if origin.is_some() && origin != Some(StyleOrigin::User) => {
                LookupResult::Value(font)
            },
            _ => LookupResult::Skip,
        }
    }

    /// The style for a font longhand on `node`, or else on one of its
    /// `distance` nearest ancestors with a style helper.
    fn font_longhand<E: Styleable>(
        &self,
        node: E,
        shorthand: &str,
        suffix: &str,
        states: &PseudoClassState,
        user_set_font: bool,
        distance: usize,
    ) -> Option<CascadingStyle> {
        let property = format!("{}{}", shorthand, suffix);
        let style = self.get_style(node, &property, states);
        if style.is_some() || user_set_font {
            return style;
        }
        StyleHelper::lookup_inherited_font(node, &property, distance)
    }

    /// Look no further than `distance` ancestors with a style helper, which
    /// is where the shorthand was found, so that the longhand and the
    /// shorthand can be compared.
    fn lookup_inherited_font<E: Styleable>(
        node: E,
        property: &str,
        distance: usize,
    ) -> Option<CascadingStyle> {
        let mut looks = distance;
        let mut parent = node.styleable_parent();
        while let Some(current) = parent {
            if looks == 0 {
                break;
            }
            let style = match current.style_helper() {
                Some(helper) => {
                    looks -= 1;
                    helper.get_style(current, property, &current.pseudo_class_states())
                },
                None => None,
            };
            if let Some(style) = style {
                if !style.value().is_inherit() {
                    return Some(style);
                }
            }
            parent = current.styleable_parent();
        }
        None
    }

    /// The font `styleable`, or its nearest ancestor with styles, uses for
    /// relative sizes.
    pub(super) fn cached_font<E: Styleable>(
        context: &SharedStyleContext,
        styleable: Option<E>,
    ) -> Option<CalculatedValue> {
        let node = styleable?;
        let helper = match node.style_helper() {
            Some(helper) if helper.cache_container.is_some() => helper,
            _ => return StyleHelper::cached_font(context, node.styleable_parent()),
        };
        let container = helper.cache_container.as_ref()?;

        let key = StyleCacheEntryKey::new(
            StyleHelper::transition_states(node),
            context.default_font().clone(),
        );
        let cached = container.font_size_cache.borrow().get(&key).cloned();
        cached.or_else(|| {
            helper
                .lookup_font(context, node, FONT_PROPERTY, None, &mut None)
                .into_value()
        })
    }
}

/// A longhand only overrides the shorthand if its style takes precedence
/// over the shorthand's, and only replaces parts set with an origin that is
/// not higher than its own.
fn accepts_longhand(
    longhand: Option<CascadingStyle>,
    shorthand: Option<&CascadingStyle>,
    origin: Option<StyleOrigin>,
) -> Option<CascadingStyle> {
    let longhand = longhand?;
    if !shorthand.is_none_or(|shorthand| longhand.overrides_shorthand(shorthand)) {
        return None;
    }
    if !origin.is_none_or(|origin| origin <= longhand.origin()) {
        return None;
    }
    Some(longhand)
}

fn base_font(context: &SharedStyleContext, cv_font: Option<&CalculatedValue>) -> Font {
    super::lookup::reference_font(context, cv_font)
}

/// Derive a font from the one resolved so far, changing one part.
fn derive_font<F>(
    context: &SharedStyleContext,
    cv_font: Option<&CalculatedValue>,
    origin: Option<StyleOrigin>,
    derive: F,
) -> CalculatedValue
where
    F: FnOnce(&Font) -> Font,
{
    let relative = cv_font.is_some_and(|font| font.relative);
    let font = derive(&base_font(context, cv_font));
    CalculatedValue::new(Some(StyleValue::Font(font)), origin, relative)
}
