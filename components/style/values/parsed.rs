/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Declared values, as produced by the stylesheet parser.

use crate::Atom;
use crate::converters::StyleConverter;
use crate::error_reporting::ConversionError;
use crate::values::{Color, Font, Size, SizeUnits, StyleValue};
use std::fmt;
use std::sync::Arc;

/// The literal keyword that makes a declaration take its parent's value.
pub const INHERIT: &str = "inherit";

/// The kinds of value a declaration can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `null`: the property explicitly has no value.
    Null,
    Ident(Atom),
    String(String),
    Number(f64),
    Size(Size),
    Color(Color),
    /// A reference to the value of another property, looked up in the
    /// cascade of the node being styled and its ancestors.
    Lookup(Atom),
    Sequence(Vec<Arc<ParsedValue>>),
    Layers(Vec<Vec<Arc<ParsedValue>>>),
}

/// A declared value, and optionally the converter that turns it into a
/// computed value. When present, that converter takes priority over the one
/// of the property the value is declared for; functions such as
/// `derive(<color>, <percentage>)` are expressed this way.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedValue {
    value: Value,
    converter: Option<StyleConverter>,
    contains_lookups: bool,
}

impl ParsedValue {
    pub fn new(value: Value) -> Self {
        let contains_lookups = match value {
            Value::Lookup(_) => true,
            Value::Sequence(ref values) => values.iter().any(|v| v.contains_lookups),
            Value::Layers(ref layers) => layers
                .iter()
                .flat_map(|layer| layer.iter())
                .any(|v| v.contains_lookups),
            _ => false,
        };
        ParsedValue {
            value,
            converter: None,
            contains_lookups,
        }
    }

    pub fn with_converter(mut self, converter: StyleConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// A value holding `value`, converted the same way as `self`.
    pub fn rebuild(&self, value: Value) -> Self {
        ParsedValue {
            converter: self.converter,
            ..ParsedValue::new(value)
        }
    }

    pub fn null() -> Self {
        ParsedValue::new(Value::Null)
    }

    pub fn ident(ident: &str) -> Self {
        ParsedValue::new(Value::Ident(Atom::from(ident)))
    }

    pub fn string(string: &str) -> Self {
        ParsedValue::new(Value::String(string.to_owned()))
    }

    pub fn number(number: f64) -> Self {
        ParsedValue::new(Value::Number(number))
    }

    pub fn size(value: f64, units: SizeUnits) -> Self {
        ParsedValue::new(Value::Size(Size::new(value, units)))
    }

    pub fn px(value: f64) -> Self {
        ParsedValue::size(value, SizeUnits::Px)
    }

    pub fn color(color: Color) -> Self {
        ParsedValue::new(Value::Color(color))
    }

    pub fn lookup(name: &str) -> Self {
        ParsedValue::new(Value::Lookup(Atom::from(name)))
    }

    pub fn sequence(values: Vec<ParsedValue>) -> Self {
        ParsedValue::new(Value::Sequence(values.into_iter().map(Arc::new).collect()))
    }

    pub fn layers(layers: Vec<Vec<ParsedValue>>) -> Self {
        ParsedValue::new(Value::Layers(
            layers
                .into_iter()
                .map(|layer| layer.into_iter().map(Arc::new).collect())
                .collect(),
        ))
    }

    /// `derive(<color>, <brightness>%)`.
    pub fn derive(color: ParsedValue, brightness: f64) -> Self {
        ParsedValue::sequence(vec![color, ParsedValue::size(brightness, SizeUnits::Percent)])
            .with_converter(StyleConverter::DeriveColor)
    }

    /// A `-fx-font` shorthand value. Absent parts take their value from the
    /// reference font or from the initial value.
    pub fn font(
        family: Option<&str>,
        size: Option<Size>,
        weight: Option<ParsedValue>,
        style: Option<&str>,
    ) -> Self {
        ParsedValue::sequence(vec![
            family.map_or_else(ParsedValue::null, ParsedValue::string),
            size.map_or_else(ParsedValue::null, |size| ParsedValue::new(Value::Size(size))),
            weight.unwrap_or_else(ParsedValue::null),
            style.map_or_else(ParsedValue::null, ParsedValue::ident),
        ])
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn converter(&self) -> Option<StyleConverter> {
        self.converter
    }

    /// The name this value looks up, if it is a lookup.
    pub fn lookup_name(&self) -> Option<&Atom> {
        match self.value {
            Value::Lookup(ref name) => Some(name),
            _ => None,
        }
    }

    /// Whether this value, or any value nested in it, is a lookup.
    pub fn contains_lookups(&self) -> bool {
        self.contains_lookups
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self.value, Value::Ident(ref ident) if &**ident == INHERIT)
    }

    pub fn is_null(&self) -> bool {
        match self.value {
            Value::Null => true,
            Value::Ident(ref ident) => &**ident == "null",
            _ => false,
        }
    }

    /// The first lookup that is still present in this value, in document
    /// order.
    pub fn first_lookup(&self) -> Option<&Atom> {
        match self.value {
            Value::Lookup(ref name) => Some(name),
            Value::Sequence(ref values) => values.iter().find_map(|v| v.first_lookup()),
            Value::Layers(ref layers) => layers
                .iter()
                .flat_map(|layer| layer.iter())
                .find_map(|v| v.first_lookup()),
            _ => None,
        }
    }

    /// Whether converting this value depends on the reference font. For
    /// font properties, percentages are relative to the font size too.
    pub fn contains_font_relative_size(&self, is_font_property: bool) -> bool {
        match self.value {
            Value::Size(size) => {
                size.units.is_font_relative() ||
                    (is_font_property && size.units == SizeUnits::Percent)
            },
            Value::Sequence(ref values) => values
                .iter()
                .any(|v| v.contains_font_relative_size(is_font_property)),
            Value::Layers(ref layers) => layers
                .iter()
                .flat_map(|layer| layer.iter())
                .any(|v| v.contains_font_relative_size(is_font_property)),
            _ => false,
        }
    }

    /// Convert with this value's own converter, falling back to `fallback`.
    pub fn convert_with(
        &self,
        fallback: StyleConverter,
        font: &Font,
    ) -> Result<StyleValue, ConversionError> {
        self.converter.unwrap_or(fallback).convert(self, font)
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value {
            Value::Null => f.write_str("null"),
            Value::Ident(ref ident) => f.write_str(ident),
            Value::String(ref string) => write!(f, "\"{}\"", string),
            Value::Number(number) => write!(f, "{}", number),
            Value::Size(size) => write!(f, "{}", size),
            Value::Color(color) => write!(f, "{}", color),
            Value::Lookup(ref name) => f.write_str(name),
            Value::Sequence(ref values) => {
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            },
            Value::Layers(ref layers) => {
                for (i, layer) in layers.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    for (j, value) in layer.iter().enumerate() {
                        if j != 0 {
                            f.write_str(" ")?;
                        }
                        write!(f, "{}", value)?;
                    }
                }
                Ok(())
            },
        }
    }
}
