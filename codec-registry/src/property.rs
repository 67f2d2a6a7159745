//! Typed `name=value` properties for writer configuration overrides.
use snafu::{ensure, OptionExt, Snafu};
use std::fmt;
use std::str::FromStr;

/// Error type for a malformed property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("Invalid property `{}`: expected `name=value`", text))]
pub struct ParsePropertyError {
    text: String,
}

/// The value of a writer property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A boolean flag
    Bool(bool),
    /// A 32-bit integer number
    Int(i32),
    /// A floating point number
    Float(f64),
    /// Any other text
    Str(String),
}

impl PropertyValue {
    /// Interpret the textual form of a property value.
    ///
    /// A value between single quotes is always text.
    /// Otherwise, `true` and `false` (in any case) are booleans,
    /// then 32-bit integers and floating point numbers are recognized,
    /// and anything else is text.
    /// Integers out of the 32-bit range are taken as floating point numbers.
    /// Non-finite numbers are only recognized as `NaN` and `Infinity`.
    pub fn parse(text: &str) -> Self {
        if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
            return PropertyValue::Str(text[1..text.len() - 1].to_string());
        }
        if text.eq_ignore_ascii_case("true") {
            return PropertyValue::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return PropertyValue::Bool(false);
        }
        if let Ok(v) = text.parse() {
            return PropertyValue::Int(v);
        }
        if let Some(v) = parse_float(text) {
            return PropertyValue::Float(v);
        }
        PropertyValue::Str(text.to_string())
    }

    /// Obtain the value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Obtain the value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Obtain the value as a floating point number.
    /// Integers are converted.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    /// Obtain the value as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

fn parse_float(text: &str) -> Option<f64> {
    let v: f64 = text.parse().ok()?;
    if v.is_finite() {
        return Some(v);
    }
    match text.trim_start_matches(['+', '-']) {
        "NaN" | "Infinity" => Some(v),
        _ => None,
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropertyValue::Bool(v) => write!(f, "{}", v),
            PropertyValue::Int(v) => write!(f, "{}", v),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Str(v) => write!(f, "'{}'", v),
        }
    }
}

/// A named configuration override.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    value: PropertyValue,
}

impl Property {
    /// Create a new property.
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Property {
            name: name.into(),
            value,
        }
    }

    /// The property's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The property's value.
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Parse a list of properties separated by `delimiter`.
    ///
    /// Surrounding whitespace is ignored and empty items are skipped,
    /// so an absent or blank list yields no properties.
    pub fn parse_list(text: &str, delimiter: char) -> Result<Vec<Property>, ParsePropertyError> {
        text.split(delimiter)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Property {
    type Err = ParsePropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s.split_once('=').context(ParsePropertySnafu { text: s })?;
        let name = name.trim();
        ensure!(!name.is_empty(), ParsePropertySnafu { text: s });
        Ok(Property::new(name, PropertyValue::parse(value.trim())))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("true", PropertyValue::Bool(true))]
    #[case("FALSE", PropertyValue::Bool(false))]
    #[case("75", PropertyValue::Int(75))]
    #[case("-2", PropertyValue::Int(-2))]
    #[case("0.75", PropertyValue::Float(0.75))]
    #[case("JPEG-LS", PropertyValue::Str("JPEG-LS".to_string()))]
    #[case("'42'", PropertyValue::Str("42".to_string()))]
    #[case("", PropertyValue::Str(String::new()))]
    #[case("3000000000", PropertyValue::Float(3e9))]
    #[case("-Infinity", PropertyValue::Float(f64::NEG_INFINITY))]
    #[case("inf", PropertyValue::Str("inf".to_string()))]
    #[case("nan", PropertyValue::Str("nan".to_string()))]
    fn typed_values(#[case] text: &str, #[case] expected: PropertyValue) {
        assert_eq!(PropertyValue::parse(text), expected);
    }

    #[test]
    fn java_nan_is_a_number() {
        assert!(PropertyValue::parse("NaN").as_float().unwrap().is_nan());
        assert_eq!(PropertyValue::parse("2147483647").as_int(), Some(i32::MAX));
    }

    #[test]
    fn parse_semicolon_list() {
        let props = Property::parse_list("compressionType=LOSSLESS; quality=0.8;;nearLossless=0", ';')
            .unwrap();
        assert_eq!(
            props,
            vec![
                Property::new("compressionType", PropertyValue::Str("LOSSLESS".into())),
                Property::new("quality", PropertyValue::Float(0.8)),
                Property::new("nearLossless", PropertyValue::Int(0)),
            ]
        );
        assert_eq!(props[1].to_string(), "quality=0.8");

        assert!(Property::parse_list("  ", ';').unwrap().is_empty());
    }

    #[test]
    fn reject_malformed_items() {
        assert!(Property::parse_list("quality", ';').is_err());
        assert!(Property::parse_list("a=1;=2", ';').is_err());
    }
}
