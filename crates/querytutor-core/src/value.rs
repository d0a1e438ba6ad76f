//! Scalar cell values for tabular datasets.

use std::fmt;

/// A scalar value held in a table cell.
///
/// Loaded datasets arrive whitespace-trimmed and null-normalized, so a
/// cell is always one of these four shapes. Type inference may rewrite
/// `Text` cells into their numeric forms (see [`crate::infer`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Value {
    /// Parses a raw cell as produced by a delimited-file reader.
    ///
    /// Empty cells and the literal `NULL` become [`Value::Null`];
    /// integer-looking text becomes [`Value::Integer`], float-looking
    /// text becomes [`Value::Float`], everything else stays [`Value::Text`].
    pub fn from_raw(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "NULL" {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Text(trimmed.to_string())
    }

    /// Returns the numeric reading of this value, if it has one.
    ///
    /// `Text` succeeds only when the whole string parses as a number;
    /// `Null` never does.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            Value::Null => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for [`Value::Text`].
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Converts the cell into a JSON value for simulated query outputs.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Null => serde_json::Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Text(s) => write!(f, "{}", s),
            Value::Null => write!(f, "NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_classification() {
        assert_eq!(Value::from_raw("42"), Value::Integer(42));
        assert_eq!(Value::from_raw("3.25"), Value::Float(3.25));
        assert_eq!(Value::from_raw("hello"), Value::Text("hello".to_string()));
        assert_eq!(Value::from_raw(""), Value::Null);
        assert_eq!(Value::from_raw("NULL"), Value::Null);
        assert_eq!(Value::from_raw("  7  "), Value::Integer(7));
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Integer(5).as_number(), Some(5.0));
        assert_eq!(Value::Float(1.5).as_number(), Some(1.5));
        assert_eq!(Value::Text("2.5".to_string()).as_number(), Some(2.5));
        assert_eq!(Value::Text("abc".to_string()).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn test_display_null_sentinel() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Float(5.0).to_string(), "5");
        assert_eq!(Value::Text("x".to_string()).to_string(), "x");
    }
}
