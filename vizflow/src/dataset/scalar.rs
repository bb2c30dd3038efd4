//! Typed scalar cells for tabular data.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single cell value in a [`crate::dataset::Frame`].
///
/// Ingestion infers the narrowest variant per cell; `Null` covers empty
/// CSV fields, JSON `null`, and blank spreadsheet cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Missing value.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
}

impl Scalar {
    /// Infers a scalar from raw text, narrowest type first.
    ///
    /// Empty text becomes `Null`; `true`/`false` become `Bool`; integer and
    /// float parses are tried before falling back to `Str`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::Null;
        }
        match text {
            "true" | "True" => return Self::Bool(true),
            "false" | "False" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Str(text.to_string())
    }

    /// Converts a JSON value into a scalar.
    ///
    /// Non-scalar JSON (arrays, objects) is flattened to its compact text
    /// rendering rather than rejected.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::Str(s.clone()),
            other => Self::Str(other.to_string()),
        }
    }

    /// Returns true for the `Null` variant.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the variant name used in summaries and error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
        }
    }

    /// Numeric view of the scalar, coercing `Int` to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Total ordering used by sorts: nulls first, then by type rank,
    /// numerics cross-compared as `f64`.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_inference() {
        assert_eq!(Scalar::parse(""), Scalar::Null);
        assert_eq!(Scalar::parse("true"), Scalar::Bool(true));
        assert_eq!(Scalar::parse("False"), Scalar::Bool(false));
        assert_eq!(Scalar::parse("42"), Scalar::Int(42));
        assert_eq!(Scalar::parse("-7"), Scalar::Int(-7));
        assert_eq!(Scalar::parse("3.5"), Scalar::Float(3.5));
        assert_eq!(Scalar::parse("hello"), Scalar::Str("hello".to_string()));
        assert_eq!(Scalar::parse("12abc"), Scalar::Str("12abc".to_string()));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Scalar::from_json(&serde_json::json!(null)), Scalar::Null);
        assert_eq!(Scalar::from_json(&serde_json::json!(1)), Scalar::Int(1));
        assert_eq!(Scalar::from_json(&serde_json::json!(1.5)), Scalar::Float(1.5));
        assert_eq!(
            Scalar::from_json(&serde_json::json!("x")),
            Scalar::Str("x".to_string())
        );
        assert_eq!(
            Scalar::from_json(&serde_json::json!([1, 2])),
            Scalar::Str("[1,2]".to_string())
        );
    }

    #[test]
    fn test_compare_cross_numeric() {
        assert_eq!(Scalar::Int(2).compare(&Scalar::Float(2.0)), Ordering::Equal);
        assert_eq!(Scalar::Int(1).compare(&Scalar::Float(1.5)), Ordering::Less);
        assert_eq!(Scalar::Null.compare(&Scalar::Int(0)), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::Null.to_string(), "null");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Str("a b".to_string()).to_string(), "a b");
    }
}
