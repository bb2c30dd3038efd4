//! The persistent variable store shared across pipeline stages.

use super::Value;
use crate::dataset::Frame;

/// Name of the designated primary dataset variable.
pub const PRIMARY_DATASET: &str = "df";

/// An insertion-ordered mapping of variable names to values.
///
/// The store is created once at pipeline start from the ingested dataset
/// and then only extended or overwritten by sandbox executions — there is
/// no removal operation. It is a plain owned structure threaded by
/// mutable reference through the orchestrator; sequential stage execution
/// guarantees a single writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextStore {
    entries: Vec<(String, Value)>,
}

impl ContextStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the primary dataset.
    #[must_use]
    pub fn seeded(frame: Frame) -> Self {
        let mut store = Self::new();
        store.set(PRIMARY_DATASET, Value::Frame(frame));
        store
    }

    /// Gets a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Sets a value, overwriting in place (keeping first-insertion order)
    /// or appending a new entry.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Checks whether a name is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// All current name→value pairs, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.entries.clone()
    }

    /// Replaces the full contents with `entries`.
    ///
    /// This is the sandbox's commit step: after a script completes
    /// normally, the store becomes exactly the script's final namespace.
    pub fn replace_all(&mut self, entries: Vec<(String, Value)>) {
        self.entries = entries;
    }

    /// Names in insertion order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no variables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The primary dataset, when present and tabular.
    #[must_use]
    pub fn primary(&self) -> Option<&Frame> {
        self.get(PRIMARY_DATASET).and_then(Value::as_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Scalar;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get() {
        let mut store = ContextStore::new();
        store.set("x", Value::from(1i64));

        assert_eq!(store.get("x"), Some(&Value::from(1i64)));
        assert!(store.contains("x"));
        assert!(!store.contains("y"));
    }

    #[test]
    fn test_overwrite_keeps_insertion_order() {
        let mut store = ContextStore::new();
        store.set("a", Value::from(1i64));
        store.set("b", Value::from(2i64));
        store.set("a", Value::from(3i64));

        assert_eq!(store.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.get("a"), Some(&Value::from(3i64)));
    }

    #[test]
    fn test_seeded_contains_primary() {
        let frame = Frame::new(vec!["a".to_string()]).unwrap();
        let store = ContextStore::seeded(frame.clone());

        assert_eq!(store.len(), 1);
        assert_eq!(store.primary(), Some(&frame));
    }

    #[test]
    fn test_primary_absent_when_not_a_frame() {
        let mut store = ContextStore::new();
        store.set(PRIMARY_DATASET, Value::Scalar(Scalar::Int(1)));
        assert!(store.primary().is_none());
    }

    #[test]
    fn test_replace_all() {
        let mut store = ContextStore::new();
        store.set("a", Value::from(1i64));

        store.replace_all(vec![
            ("a".to_string(), Value::from(2i64)),
            ("b".to_string(), Value::from(3i64)),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some(&Value::from(2i64)));
        assert_eq!(store.get("b"), Some(&Value::from(3i64)));
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut store = ContextStore::new();
        store.set("a", Value::from(1i64));

        let snapshot = store.snapshot();
        store.set("a", Value::from(9i64));

        assert_eq!(snapshot[0].1, Value::from(1i64));
    }
}
