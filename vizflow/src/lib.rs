//! # Vizflow
//!
//! An agent-orchestrated data visualization pipeline.
//!
//! Vizflow ingests a tabular dataset and walks it through four
//! agent-driven stages — preprocessing, analysis, visualization
//! suggestion, and visualization code generation — around a shared,
//! persistent context store:
//!
//! - **Context store**: named variables (the dataset plus anything
//!   scripts derive) persisting across stage executions
//! - **Execution sandbox**: runs agent-proposed transform scripts
//!   against the store, committing the namespace only on success
//! - **Summarizer**: a bounded text digest of the store, regenerated
//!   before each stage as prompt input
//! - **Orchestrator**: sequences the stages, streams agent output to the
//!   caller, and reports the final dataset shape
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vizflow::prelude::*;
//!
//! let config = PipelineConfig {
//!     data_path: "data.csv".into(),
//!     output_dir: "output".into(),
//!     model: "gpt-4o".into(),
//! };
//! let factory = Arc::new(ProviderAgentFactory::new(ProviderConfig::from_env()));
//! let report = Pipeline::new(config, factory).run(&mut StdoutSink).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

pub mod agent;
pub mod context;
pub mod dataset;
pub mod errors;
pub mod exec;
pub mod pipeline;
pub mod sink;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agent::{
        Agent, AgentFactory, AgentSpec, ChatProviderAgent, ProviderAgentFactory, ProviderConfig,
        SandboxTool, ScriptTool,
    };
    pub use crate::context::{summarize, ContextStore, Value, PRIMARY_DATASET};
    pub use crate::dataset::{load_frame, Frame, Scalar};
    pub use crate::errors::{AgentError, IngestError, VizflowError};
    pub use crate::exec::{ExecOutcome, Sandbox};
    pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineReport, StageKind};
    pub use crate::sink::{CollectingSink, NullSink, PipelineSink, StdoutSink};
}
