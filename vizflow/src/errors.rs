//! Error types for the vizflow pipeline.
//!
//! Script failures inside the sandbox are deliberately *not* part of this
//! taxonomy: they are converted into [`crate::exec::ExecOutcome::Failure`]
//! values and fed back to the agent runtime as tool output.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Debug, Error)]
pub enum VizflowError {
    /// Dataset ingestion failed. Fatal before any stage runs.
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// The external agent call itself failed. Fatal to the pipeline.
    #[error("{0}")]
    Agent(#[from] AgentError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised while loading a dataset from disk.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The dataset file does not exist.
    #[error("file not found at {path}")]
    FileNotFound {
        /// The path that was probed.
        path: PathBuf,
    },

    /// The file extension maps to no supported format.
    #[error("unsupported file extension: {extension:?}")]
    UnsupportedExtension {
        /// The offending extension (empty when the path has none).
        extension: String,
    },

    /// The file exists but could not be parsed as its format.
    #[error("error loading {path}: {message}")]
    Parse {
        /// The path that failed to parse.
        path: PathBuf,
        /// Description of the underlying cause.
        message: String,
    },
}

impl IngestError {
    /// Wraps an underlying parse failure for `path`.
    pub fn parse(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: cause.to_string(),
        }
    }
}

/// Error raised by the chat-provider agent runtime.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Network or connection failure.
    #[error("network error: {0}")]
    Network(String),

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },

    /// The response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Authentication was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The model produced no usable content.
    #[error("empty response from model")]
    EmptyResponse,

    /// Other provider failure.
    #[error("{0}")]
    Other(String),
}

/// Error raised by frame operations (unknown columns, arity mismatches).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    /// A referenced column does not exist.
    #[error("no such column: {name:?}")]
    UnknownColumn {
        /// The missing column name.
        name: String,
    },

    /// A row had the wrong number of cells.
    #[error("row has {got} cells, frame has {expected} columns")]
    RowArity {
        /// Cells supplied.
        got: usize,
        /// Columns in the frame.
        expected: usize,
    },

    /// A column name was used twice.
    #[error("duplicate column name: {name:?}")]
    DuplicateColumn {
        /// The duplicated name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_display() {
        let err = IngestError::UnsupportedExtension {
            extension: "parquet".to_string(),
        };
        assert!(err.to_string().contains("parquet"));

        let err = IngestError::parse("data.csv", "bad header");
        assert!(err.to_string().contains("data.csv"));
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn test_pipeline_error_from_ingest() {
        let err: VizflowError = IngestError::FileNotFound {
            path: PathBuf::from("missing.csv"),
        }
        .into();
        assert!(matches!(err, VizflowError::Ingest(_)));
    }

    #[test]
    fn test_agent_error_display() {
        let err = AgentError::Api {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(err.to_string().contains("429"));
    }
}
