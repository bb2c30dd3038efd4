//! The execution sandbox: scripts in, store mutations out.

use super::interp::Interpreter;
use super::ExecOutcome;
use crate::context::ContextStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fixed preamble prepended to every script.
///
/// Forces chart builtins into headless file-only rendering before any
/// user statement runs; without it a chart call would fail waiting for a
/// display that does not exist.
pub const RENDER_PREAMBLE: &str = "set_render_target(\"file\")";

/// Executes agent-proposed scripts against the shared context store.
///
/// Each execution binds the store's current entries as the script
/// namespace. On normal completion the store is overwritten with exactly
/// the post-execution namespace — names created, rebound and untouched
/// alike. On failure the store is exactly as it was before the call and
/// the failure is returned as data, never as an error.
#[derive(Debug, Clone)]
pub struct Sandbox {
    store: Arc<Mutex<ContextStore>>,
}

impl Sandbox {
    /// Creates a sandbox over a shared store handle.
    #[must_use]
    pub fn new(store: Arc<Mutex<ContextStore>>) -> Self {
        Self { store }
    }

    /// The shared store handle.
    #[must_use]
    pub fn store(&self) -> Arc<Mutex<ContextStore>> {
        Arc::clone(&self.store)
    }

    /// Runs one script to completion.
    pub fn execute(&self, code: &str) -> ExecOutcome {
        debug!(script = %code, "executing script");

        let bindings = self.store.lock().snapshot();
        let mut interpreter = Interpreter::with_bindings(bindings);
        let source = format!("{RENDER_PREAMBLE}\n{code}");

        match interpreter.run(&source) {
            Ok(()) => {
                for path in interpreter.files_written() {
                    debug!(path = %path.display(), "script wrote chart file");
                }
                self.store.lock().replace_all(interpreter.into_bindings());
                ExecOutcome::Success
            }
            Err(error) => {
                warn!(%error, "script failed; store left unchanged");
                ExecOutcome::failure(&error, interpreter.trace())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Value, PRIMARY_DATASET};
    use crate::dataset::{Frame, Scalar};
    use pretty_assertions::assert_eq;

    fn sample_store() -> Arc<Mutex<ContextStore>> {
        let mut frame = Frame::new(vec!["a".to_string(), "b".to_string()]).unwrap();
        frame.push_row(vec![Scalar::Int(1), Scalar::Int(10)]).unwrap();
        frame.push_row(vec![Scalar::Int(2), Scalar::Null]).unwrap();
        Arc::new(Mutex::new(ContextStore::seeded(frame)))
    }

    #[test]
    fn test_success_overwrites_store() {
        let store = sample_store();
        let sandbox = Sandbox::new(Arc::clone(&store));

        let outcome = sandbox.execute("df = df.assign(total = 1)\nn = df.count()");
        assert!(outcome.is_success());

        let store = store.lock();
        assert_eq!(store.primary().unwrap().n_cols(), 3);
        assert_eq!(store.get("n"), Some(&Value::from(2i64)));
    }

    #[test]
    fn test_rebound_primary_is_replaced_not_merged() {
        let store = sample_store();
        let sandbox = Sandbox::new(Arc::clone(&store));

        sandbox.execute("df = df.drop_nulls()");

        let store = store.lock();
        let frame = store.primary().unwrap();
        assert_eq!(frame.shape(), (1, 2));
    }

    #[test]
    fn test_failure_leaves_store_untouched() {
        let store = sample_store();
        let sandbox = Sandbox::new(Arc::clone(&store));
        let before = store.lock().clone();

        let outcome = sandbox.execute("x = 5\ny = 1 / 0");
        assert!(!outcome.is_success());

        assert_eq!(*store.lock(), before);
    }

    #[test]
    fn test_earlier_success_survives_later_failure() {
        let store = sample_store();
        let sandbox = Sandbox::new(Arc::clone(&store));

        assert!(sandbox.execute("df = df.assign(total = 1)").is_success());
        assert!(!sandbox.execute("oops = 1 / 0").is_success());

        let store = store.lock();
        let frame = store.primary().unwrap();
        assert!(frame.column_index("total").is_some());
        assert!(frame.rows().iter().all(|r| r[2] == Scalar::Int(1)));
        assert!(store.get("oops").is_none());
    }

    #[test]
    fn test_preamble_enables_charts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let store = sample_store();
        let sandbox = Sandbox::new(store);

        let outcome = sandbox.execute(&format!(
            "bar_chart(df, \"a\", \"b\", \"{}\")",
            path.display()
        ));
        assert!(outcome.is_success(), "{}", outcome.status_text());
        assert!(path.exists());
    }

    #[test]
    fn test_failure_status_carries_trace() {
        let store = sample_store();
        let sandbox = Sandbox::new(store);

        let outcome = sandbox.execute("bad syntax here");
        let status = outcome.status_text();
        assert!(status.starts_with("Error executing code:"));
    }

    #[test]
    fn test_variables_accumulate_across_executions() {
        let store = sample_store();
        let sandbox = Sandbox::new(Arc::clone(&store));

        sandbox.execute("mean_b = df.mean(\"b\")");
        sandbox.execute("insights = {mean_b: mean_b}");

        let store = store.lock();
        assert_eq!(
            store.names(),
            vec![
                PRIMARY_DATASET.to_string(),
                "mean_b".to_string(),
                "insights".to_string()
            ]
        );
    }
}
