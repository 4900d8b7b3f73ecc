/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Conversion of declared values into computed values.
//!
//! Each styleable property names one of the converters below. A declared
//! value may carry its own converter (for example a `derive()` color
//! function), in which case that one is used instead.

use crate::Atom;
use crate::error_reporting::ConversionError;
use crate::values::font::strip_quotes;
use crate::values::{
    Color, Font, FontPosture, FontWeight, Insets, ParsedValue, SizeUnits, StyleValue, Value,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StyleConverter {
    Boolean,
    Number,
    /// A length, converted to px.
    Size,
    String,
    Ident,
    Color,
    /// `[<color>, <brightness>]`.
    DeriveColor,
    /// The font shorthand: `[<family>, <size>, <weight>, <style>]`.
    Font,
    FontSize,
    FontWeight,
    FontStyle,
    FontFamily,
    /// One to four lengths, in `top right bottom left` order.
    Insets,
}

impl StyleConverter {
    pub fn name(self) -> &'static str {
        match self {
            StyleConverter::Boolean => "BooleanConverter",
            StyleConverter::Number => "NumberConverter",
            StyleConverter::Size => "SizeConverter",
            StyleConverter::String => "StringConverter",
            StyleConverter::Ident => "IdentConverter",
            StyleConverter::Color => "ColorConverter",
            StyleConverter::DeriveColor => "DeriveColorConverter",
            StyleConverter::Font => "FontConverter",
            StyleConverter::FontSize => "FontConverter.FontSizeConverter",
            StyleConverter::FontWeight => "FontConverter.WeightConverter",
            StyleConverter::FontStyle => "FontConverter.StyleConverter",
            StyleConverter::FontFamily => "FontConverter.FontFamilyConverter",
            StyleConverter::Insets => "InsetsConverter",
        }
    }

    /// Whether values converted by this converter are sizes of fonts, which
    /// makes percentages font-relative.
    pub fn is_font_converter(self) -> bool {
        matches!(self, StyleConverter::Font | StyleConverter::FontSize)
    }

    fn mismatch(self, value: &ParsedValue) -> ConversionError {
        ConversionError::Mismatch {
            converter: self.name(),
            found: value.to_string(),
        }
    }

    /// Convert `value`, using `font` as the reference for font-relative
    /// units.
    pub fn convert(self, value: &ParsedValue, font: &Font) -> Result<StyleValue, ConversionError> {
        if let Some(name) = value.lookup_name() {
            return Err(ConversionError::UnresolvedLookup(name.clone()));
        }
        match self {
            StyleConverter::Boolean => match *value.value() {
                Value::Ident(ref ident) if (**ident).eq_ignore_ascii_case("true") => {
                    Ok(StyleValue::Boolean(true))
                },
                Value::Ident(ref ident) if (**ident).eq_ignore_ascii_case("false") => {
                    Ok(StyleValue::Boolean(false))
                },
                _ => Err(self.mismatch(value)),
            },
            StyleConverter::Number => match *value.value() {
                Value::Number(number) => Ok(StyleValue::Number(number)),
                Value::Size(size) if size.units == SizeUnits::Px => {
                    Ok(StyleValue::Number(size.value))
                },
                _ => Err(self.mismatch(value)),
            },
            StyleConverter::Size => self.length(value, 1., font).map(StyleValue::Number),
            StyleConverter::String => match *value.value() {
                Value::String(ref string) => Ok(StyleValue::String(string.clone())),
                Value::Ident(ref ident) => Ok(StyleValue::String(ident.to_string())),
                _ => Err(self.mismatch(value)),
            },
            StyleConverter::Ident => match *value.value() {
                Value::Ident(ref ident) => Ok(StyleValue::Ident(ident.clone())),
                _ => Err(self.mismatch(value)),
            },
            StyleConverter::Color => self.color(value, font).map(StyleValue::Color),
            StyleConverter::DeriveColor => self.derive_color(value, font).map(StyleValue::Color),
            StyleConverter::Font => self.font(value, font).map(StyleValue::Font),
            StyleConverter::FontSize => {
                self.length(value, font.size(), font).map(StyleValue::Number)
            },
            StyleConverter::FontWeight => self.font_weight(value, font).map(StyleValue::FontWeight),
            StyleConverter::FontStyle => match *value.value() {
                Value::Ident(ref ident) => FontPosture::from_ident(ident)
                    .map(StyleValue::FontPosture)
                    .ok_or_else(|| self.mismatch(value)),
                _ => Err(self.mismatch(value)),
            },
            StyleConverter::FontFamily => match *value.value() {
                Value::String(ref family) => Ok(StyleValue::String(strip_quotes(family).to_owned())),
                Value::Ident(ref family) => Ok(StyleValue::String(strip_quotes(family).to_owned())),
                _ => Err(self.mismatch(value)),
            },
            StyleConverter::Insets => self.insets(value, font).map(StyleValue::Insets),
        }
    }

    /// Build a composite value out of the computed values of some of its
    /// sub-properties. Sub-properties are recognized by the suffix of their
    /// name; the ones that are missing keep their initial value.
    pub fn convert_sub_properties(
        self,
        values: &[(Atom, Option<StyleValue>)],
        font: &Font,
    ) -> Result<StyleValue, ConversionError> {
        match self {
            StyleConverter::Font => {
                let mut result = Font::plain(&font.family, font.size());
                for (property, value) in values {
                    let value = match *value {
                        Some(ref value) => value,
                        None => continue,
                    };
                    result = match (value, sub_property_suffix(property)) {
                        (StyleValue::Number(size), "-size") => result.with_size(*size),
                        (StyleValue::String(family), "-family") => result.with_family(family),
                        (StyleValue::FontWeight(weight), "-weight") => result.with_weight(*weight),
                        (StyleValue::FontPosture(posture), "-style") => {
                            result.with_posture(*posture)
                        },
                        _ => return Err(self.sub_property_mismatch(property, value)),
                    };
                }
                Ok(StyleValue::Font(result))
            },
            StyleConverter::Insets => {
                let mut result = Insets::zero();
                for (property, value) in values {
                    let value = match *value {
                        Some(ref value) => value,
                        None => continue,
                    };
                    let px = match *value {
                        StyleValue::Number(px) => px,
                        _ => return Err(self.sub_property_mismatch(property, value)),
                    };
                    match sub_property_suffix(property) {
                        "-top" => result.top = px,
                        "-right" => result.right = px,
                        "-bottom" => result.bottom = px,
                        "-left" => result.left = px,
                        _ => return Err(self.sub_property_mismatch(property, value)),
                    }
                }
                Ok(StyleValue::Insets(result))
            },
            _ => Err(ConversionError::Mismatch {
                converter: self.name(),
                found: "sub-property values".to_owned(),
            }),
        }
    }

    fn sub_property_mismatch(self, property: &Atom, value: &StyleValue) -> ConversionError {
        ConversionError::Mismatch {
            converter: self.name(),
            found: format!("{}: {}", property, value),
        }
    }

    fn length(self, value: &ParsedValue, multiplier: f64, font: &Font) -> Result<f64, ConversionError> {
        match *value.value() {
            Value::Size(size) => Ok(size.pixels_with(multiplier, font)),
            Value::Number(number) => Ok(number),
            _ => Err(self.mismatch(value)),
        }
    }

    fn color(self, value: &ParsedValue, font: &Font) -> Result<Color, ConversionError> {
        if let Some(converter) = value.converter() {
            if converter != self {
                return match converter.convert(value, font)? {
                    StyleValue::Color(color) => Ok(color),
                    _ => Err(self.mismatch(value)),
                };
            }
        }
        match *value.value() {
            Value::Color(color) => Ok(color),
            Value::Ident(ref ident) if (**ident).eq_ignore_ascii_case("transparent") => {
                Ok(Color::TRANSPARENT)
            },
            Value::String(ref hex) => Color::from_hex(hex).ok_or_else(|| self.mismatch(value)),
            _ => Err(self.mismatch(value)),
        }
    }

    fn derive_color(self, value: &ParsedValue, font: &Font) -> Result<Color, ConversionError> {
        let parts = match *value.value() {
            Value::Sequence(ref parts) if parts.len() == 2 => parts,
            _ => return Err(self.mismatch(value)),
        };
        let color = StyleConverter::Color.color(&parts[0], font)?;
        let brightness = match *parts[1].value() {
            Value::Size(size) if size.units == SizeUnits::Percent => size.value / 100.,
            Value::Number(number) => number,
            _ => return Err(self.mismatch(&parts[1])),
        };
        Ok(color.derive(brightness))
    }

    fn font_weight(self, value: &ParsedValue, font: &Font) -> Result<FontWeight, ConversionError> {
        match *value.value() {
            Value::Ident(ref ident) => match (**ident).to_ascii_lowercase().as_str() {
                "normal" => Ok(FontWeight::normal()),
                "bold" => Ok(FontWeight::bold()),
                "bolder" => Ok(font.weight.bolder()),
                "lighter" => Ok(font.weight.lighter()),
                _ => Err(self.mismatch(value)),
            },
            Value::Number(number) if number.fract() == 0. => {
                FontWeight::from_int(number as i32).ok_or_else(|| self.mismatch(value))
            },
            _ => Err(self.mismatch(value)),
        }
    }

    fn font(self, value: &ParsedValue, font: &Font) -> Result<Font, ConversionError> {
        let parts = match *value.value() {
            Value::Sequence(ref parts) if parts.len() == 4 => parts,
            _ => return Err(self.mismatch(value)),
        };
        let family = match *parts[0].value() {
            Value::Null => font.family.to_string(),
            _ => match StyleConverter::FontFamily.convert(&parts[0], font)? {
                StyleValue::String(family) => family,
                _ => return Err(self.mismatch(&parts[0])),
            },
        };
        let size = match *parts[1].value() {
            Value::Null => font.size(),
            _ => StyleConverter::FontSize.length(&parts[1], font.size(), font)?,
        };
        let weight = match *parts[2].value() {
            Value::Null => FontWeight::normal(),
            _ => StyleConverter::FontWeight.font_weight(&parts[2], font)?,
        };
        let posture = match *parts[3].value() {
            Value::Null => FontPosture::Regular,
            _ => match StyleConverter::FontStyle.convert(&parts[3], font)? {
                StyleValue::FontPosture(posture) => posture,
                _ => return Err(self.mismatch(&parts[3])),
            },
        };
        Ok(Font::new(&family, weight, posture, size))
    }

    fn insets(self, value: &ParsedValue, font: &Font) -> Result<Insets, ConversionError> {
        let sides = match *value.value() {
            Value::Sequence(ref sides) => sides
                .iter()
                .map(|side| self.length(side, 1., font))
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![self.length(value, 1., font)?],
        };
        match sides[..] {
            [all] => Ok(Insets::new_all_same(all)),
            [vertical, horizontal] => Ok(Insets::new(vertical, horizontal, vertical, horizontal)),
            [top, horizontal, bottom] => Ok(Insets::new(top, horizontal, bottom, horizontal)),
            [top, right, bottom, left] => Ok(Insets::new(top, right, bottom, left)),
            _ => Err(self.mismatch(value)),
        }
    }
}

/// `-fx-font-size` has the suffix `-size` relative to `-fx-font`, and so on.
fn sub_property_suffix(property: &str) -> &str {
    match property.rfind('-') {
        Some(index) => &property[index..],
        None => property,
    }
}
