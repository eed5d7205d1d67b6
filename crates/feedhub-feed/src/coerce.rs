//! Value coercion into custom-field datatypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::FeedError;

/// Datatype of a workspace custom field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "field_datatype", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum FieldDatatype {
    /// Free text (the default).
    #[default]
    String,
    /// Finite floating-point number.
    Number,
    /// True/false flag.
    Boolean,
}

impl FieldDatatype {
    /// Return the datatype as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldDatatype {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            _ => Err(FeedError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Coerce a raw value into `datatype`. Uncoercible values become `null`.
pub fn coerce_value(value: &Value, datatype: FieldDatatype) -> Value {
    match datatype {
        FieldDatatype::String => coerce_string(value),
        FieldDatatype::Number => coerce_number(value).map_or(Value::Null, number_value),
        FieldDatatype::Boolean => coerce_boolean(value).map_or(Value::Null, Value::Bool),
    }
}

/// Read a number from a JSON number or a formatted string.
///
/// A string that is a complete numeric literal once commas are removed
/// (including scientific notation such as `"1e3"`) is read as is.
/// Otherwise everything except digits, `.` and a sign before the first
/// digit is dropped, so `"1,200"` reads as 1200, `"9.99 EUR"` as 9.99 and
/// `"EUR 1,200.50"` as 1200.5. Comma decimal separators are not supported.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_numeric_text(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let literal = text.trim().replace(',', "");
    if let Ok(n) = literal.parse::<f64>() {
        return Some(n);
    }
    let mut cleaned = String::with_capacity(literal.len());
    for c in literal.chars() {
        match c {
            '0'..='9' | '.' => cleaned.push(c),
            '-' | '+' if cleaned.is_empty() => cleaned.push(c),
            _ => {}
        }
    }
    cleaned.parse::<f64>().ok()
}

/// Largest float that still converts to an integer exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// JSON number for a finite float; integral values are stored as integers.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Read a boolean from a JSON bool, `1`/`0`, or a yes/no style string.
pub fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64()? {
            x if x == 1.0 => Some(true),
            x if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Some(true),
            "false" | "0" | "no" | "n" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Render any value as a string value.
///
/// `null` stays `null` so absent and empty remain distinguishable.
pub fn coerce_string(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(s.clone()),
        other => Value::String(value_to_text(other)),
    }
}

/// Plain-text rendering used by string coercion and text exports.
///
/// Strings are returned verbatim, `null` as empty, arrays and objects
/// JSON-encoded.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_coercion() {
        assert_eq!(coerce_value(&json!("9.99"), FieldDatatype::Number), json!(9.99));
        assert_eq!(coerce_value(&json!("1,200"), FieldDatatype::Number), json!(1200));
        assert_eq!(coerce_value(&json!("1.234,5"), FieldDatatype::Number), json!(1.2345));
        assert_eq!(coerce_value(&json!(" 12 USD"), FieldDatatype::Number), json!(12));
        assert_eq!(coerce_value(&json!("1e3"), FieldDatatype::Number), json!(1000));
        assert_eq!(coerce_value(&json!(5), FieldDatatype::Number), json!(5));
        assert_eq!(coerce_value(&json!(-0.5), FieldDatatype::Number), json!(-0.5));
        assert_eq!(coerce_value(&json!("n/a"), FieldDatatype::Number), Value::Null);
        assert_eq!(coerce_value(&json!(true), FieldDatatype::Number), Value::Null);
        assert_eq!(coerce_value(&json!(""), FieldDatatype::Number), Value::Null);
    }

    #[test]
    fn test_currency_and_unit_text() {
        let number = |s: &str| coerce_value(&json!(s), FieldDatatype::Number);
        assert_eq!(number("9.99 EUR"), json!(9.99));
        assert_eq!(number("EUR 1,200.50"), json!(1200.5));
        assert_eq!(number("12 pieces"), json!(12));
        assert_eq!(number("€ -5"), json!(-5));
        assert_eq!(number("-2.5e2"), json!(-250));
        assert_eq!(number("NaN"), Value::Null);
        assert_eq!(number("Euro"), Value::Null);
    }

    #[test]
    fn test_boolean_coercion() {
        for truthy in [json!(true), json!(1), json!("YES"), json!(" on "), json!("y"), json!("1")] {
            assert_eq!(coerce_value(&truthy, FieldDatatype::Boolean), json!(true));
        }
        for falsy in [json!(false), json!(0), json!("No"), json!("off"), json!("n"), json!("0")] {
            assert_eq!(coerce_value(&falsy, FieldDatatype::Boolean), json!(false));
        }
        assert_eq!(coerce_value(&json!(2), FieldDatatype::Boolean), Value::Null);
        assert_eq!(coerce_value(&json!("maybe"), FieldDatatype::Boolean), Value::Null);
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(coerce_value(&json!("A1"), FieldDatatype::String), json!("A1"));
        assert_eq!(coerce_value(&json!(12), FieldDatatype::String), json!("12"));
        assert_eq!(coerce_value(&json!(false), FieldDatatype::String), json!("false"));
        assert_eq!(
            coerce_value(&json!(["a", 1]), FieldDatatype::String),
            json!(r#"["a",1]"#)
        );
        assert_eq!(coerce_value(&Value::Null, FieldDatatype::String), Value::Null);
    }

    #[test]
    fn test_datatype_parse() {
        assert_eq!("Number".parse::<FieldDatatype>().unwrap(), FieldDatatype::Number);
        assert!("date".parse::<FieldDatatype>().is_err());
    }
}
