//! Discriminated result of a sandbox execution.

use super::interp::TraceEntry;
use super::ScriptError;
use std::fmt::Write as _;

/// Outcome of running one script against the context store.
///
/// Never raised: both variants flow back to the agent runtime as the
/// tool's status text, so a failing script is the agent's problem to
/// correct, not the pipeline's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The script completed and the store was updated.
    Success,
    /// The script failed; the store was left untouched.
    Failure {
        /// What went wrong, with the source line when known.
        message: String,
        /// Executed statements, failing one last.
        trace: String,
    },
}

impl ExecOutcome {
    /// Builds a failure outcome from a script error and the execution
    /// trace collected up to the failing statement.
    #[must_use]
    pub fn failure(error: &ScriptError, entries: &[TraceEntry]) -> Self {
        let mut trace = String::new();
        if entries.is_empty() {
            trace.push_str("  (no statements executed)");
        } else {
            for (i, entry) in entries.iter().enumerate() {
                let marker = if i + 1 == entries.len() { "  <- error" } else { "" };
                let _ = write!(trace, "  line {}: {}{marker}", entry.line, entry.text);
                if i + 1 < entries.len() {
                    trace.push('\n');
                }
            }
        }
        Self::Failure {
            message: error.to_string(),
            trace,
        }
    }

    /// Returns true for `Success`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Renders the status text fed back to the agent runtime as the
    /// tool's output.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Success => "Code executed successfully.".to_string(),
            Self::Failure { message, trace } => {
                format!("Error executing code: {message}\nTrace:\n{trace}")
            }
        }
    }
}
