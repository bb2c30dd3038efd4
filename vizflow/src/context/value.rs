//! Polymorphic variable values held by the context store.

use crate::dataset::{Frame, Scalar};
use std::fmt;

/// A value bound to a variable name in the [`super::ContextStore`].
///
/// Records preserve insertion order so summaries and renderings are
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A scalar (null, bool, int, float, string).
    Scalar(Scalar),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An insertion-ordered mapping of string keys to values.
    Record(Vec<(String, Value)>),
    /// A tabular frame.
    Frame(Frame),
}

impl Value {
    /// The type tag used in summaries and error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(s) => s.type_name(),
            Self::List(_) => "list",
            Self::Record(_) => "record",
            Self::Frame(_) => "frame",
        }
    }

    /// Returns the contained frame, if this value is one.
    #[must_use]
    pub const fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the contained scalar, if this value is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key in a record value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Best-effort single-line rendering, never failing.
    ///
    /// Frames render as their shape rather than their contents; long
    /// output is truncated by the caller where bounds matter.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Scalar(s) => s.to_string(),
            Self::List(items) => {
                let inner: Vec<String> = items.iter().map(Self::render).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Record(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.render()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Frame(f) => {
                let (rows, cols) = f.shape();
                format!("frame with {rows} rows x {cols} columns")
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Frame> for Value {
    fn from(frame: Frame) -> Self {
        Self::Frame(frame)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_scalar_and_list() {
        assert_eq!(Value::from(3i64).render(), "3");
        let list = Value::List(vec![Value::from(1i64), Value::from("x")]);
        assert_eq!(list.render(), "[1, x]");
    }

    #[test]
    fn test_render_record_preserves_order() {
        let record = Value::Record(vec![
            ("b".to_string(), Value::from(2i64)),
            ("a".to_string(), Value::from(1i64)),
        ]);
        assert_eq!(record.render(), "{b: 2, a: 1}");
    }

    #[test]
    fn test_record_get() {
        let record = Value::Record(vec![("mean".to_string(), Value::from(1.5))]);
        assert_eq!(record.get("mean"), Some(&Value::from(1.5)));
        assert_eq!(record.get("other"), None);
    }

    #[test]
    fn test_render_frame_is_shape_only() {
        let frame = Frame::new(vec!["a".to_string()]).unwrap();
        assert_eq!(Value::from(frame).render(), "frame with 0 rows x 1 columns");
    }
}
