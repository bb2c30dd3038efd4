//! Script execution: the constrained transform language and its sandbox.
//!
//! This module provides:
//! - A small script language (lexer, parser, tree-walking evaluator)
//!   restricted to a safe operation set over the dataset
//! - [`Sandbox`], which binds the context store as the script namespace
//!   and applies the overwrite-on-success store rule
//! - [`ExecOutcome`], the never-raised execution result fed back to agents
//! - Headless SVG chart rendering for the chart builtins

mod ast;
mod interp;
mod outcome;
mod parser;
pub mod plot;
mod sandbox;
mod token;

pub use interp::{Interpreter, TraceEntry};
pub use outcome::ExecOutcome;
pub use sandbox::{Sandbox, RENDER_PREAMBLE};

/// A lex, parse, or runtime error inside a script.
///
/// Internal to the sandbox: callers of [`Sandbox::execute`] only ever see
/// [`ExecOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    message: String,
    line: Option<u32>,
}

impl ScriptError {
    /// An error pinned to a source line.
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
        }
    }

    /// An error with no line yet; the executing statement attaches one.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
        }
    }

    /// Wraps a frame operation error.
    #[must_use]
    pub fn from_frame(error: crate::errors::FrameError) -> Self {
        Self::msg(error.to_string())
    }

    /// Attaches a line if none is set.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
        }
        self
    }

    /// The source line, when known.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        self.line
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ScriptError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_error_display() {
        assert_eq!(ScriptError::new("boom", 3).to_string(), "boom (line 3)");
        assert_eq!(ScriptError::msg("boom").to_string(), "boom");
    }

    #[test]
    fn test_with_line_keeps_existing() {
        let err = ScriptError::new("boom", 3).with_line(9);
        assert_eq!(err.line(), Some(3));
    }
}
