//! The pipeline orchestrator.
//!
//! Sequences `Ingest → Preprocess → Analyze → Suggest → GenerateVizCode`
//! with no retries and no skipping. Stage agents stream text to the
//! caller's sink; sandbox failures inside a stage are the agent's to
//! correct and never surface here.

use super::prompts;
use super::StageKind;
use crate::agent::{
    analyzer_spec, preprocessor_spec, suggestion_spec, viz_coder_spec, Agent, AgentFactory,
    SandboxTool, ScriptTool,
};
use crate::context::{summarize, ContextStore};
use crate::dataset::load_frame;
use crate::errors::VizflowError;
use crate::exec::Sandbox;
use crate::sink::PipelineSink;
use futures::StreamExt;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Pipeline inputs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the dataset (CSV, Excel, or JSON).
    pub data_path: PathBuf,
    /// Directory generated scripts write charts into. May not exist; the
    /// visualization stage is told to create it.
    pub output_dir: PathBuf,
    /// Model identifier passed to every stage agent.
    pub model: String,
}

/// Completion report: the primary dataset's final shape plus the
/// accumulated suggestion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// `(rows, columns)` of the primary dataset when the pipeline ended.
    pub final_shape: (usize, usize),
    /// Full text of the suggestion stage.
    pub suggestions: String,
    /// Total wall-clock time in milliseconds.
    pub duration_ms: u128,
}

/// The four-stage orchestrator.
pub struct Pipeline {
    config: PipelineConfig,
    factory: Arc<dyn AgentFactory>,
}

impl Pipeline {
    /// Creates a pipeline over an agent factory.
    #[must_use]
    pub fn new(config: PipelineConfig, factory: Arc<dyn AgentFactory>) -> Self {
        Self { config, factory }
    }

    /// Runs the whole pipeline, streaming stage output into `sink`.
    ///
    /// # Errors
    ///
    /// Ingestion failures and agent-invocation failures are fatal and
    /// propagate; script failures inside a stage do not.
    pub async fn run(&self, sink: &mut dyn PipelineSink) -> Result<PipelineReport, VizflowError> {
        let started = Instant::now();

        // Ingest. Fatal on failure, before any stage runs.
        let frame = load_frame(&self.config.data_path)?;
        let store = Arc::new(Mutex::new(ContextStore::seeded(frame)));
        let sandbox_tool: Arc<dyn ScriptTool> =
            Arc::new(SandboxTool::new(Sandbox::new(Arc::clone(&store))));

        // Preprocess: clean the dataset in place.
        let summary = summarize(&store.lock());
        info!(summary = %summary, "initial dataset summary");
        let agent = self.build_agent(StageKind::Preprocess, &sandbox_tool)?;
        self.run_stage(
            StageKind::Preprocess,
            agent.as_ref(),
            &prompts::preprocess_prompt(&summary),
            sink,
        )
        .await?;

        // Analyze: derive the `insights` variable.
        let summary = summarize(&store.lock());
        let agent = self.build_agent(StageKind::Analyze, &sandbox_tool)?;
        self.run_stage(
            StageKind::Analyze,
            agent.as_ref(),
            &prompts::analyze_prompt(&summary),
            sink,
        )
        .await?;

        // Suggest: pure text, accumulated for the next stage.
        let summary = summarize(&store.lock());
        let agent = self.build_agent(StageKind::Suggest, &sandbox_tool)?;
        let suggestions = self
            .run_stage(
                StageKind::Suggest,
                agent.as_ref(),
                &prompts::suggest_prompt(&summary),
                sink,
            )
            .await?;

        // Generate visualization code: summary + suggestions + output dir.
        let summary = summarize(&store.lock());
        let agent = self.build_agent(StageKind::VizCode, &sandbox_tool)?;
        self.run_stage(
            StageKind::VizCode,
            agent.as_ref(),
            &prompts::viz_code_prompt(&summary, &suggestions, &self.config.output_dir),
            sink,
        )
        .await?;

        let final_shape = store.lock().primary().map_or((0, 0), crate::dataset::Frame::shape);
        let duration_ms = started.elapsed().as_millis();
        info!(
            rows = final_shape.0,
            cols = final_shape.1,
            duration_ms,
            "pipeline complete"
        );

        Ok(PipelineReport {
            final_shape,
            suggestions,
            duration_ms,
        })
    }

    fn build_agent(
        &self,
        stage: StageKind,
        sandbox_tool: &Arc<dyn ScriptTool>,
    ) -> Result<Arc<dyn Agent>, VizflowError> {
        let model = &self.config.model;
        let spec = match stage {
            StageKind::Preprocess => preprocessor_spec(model),
            StageKind::Analyze => analyzer_spec(model),
            StageKind::Suggest => suggestion_spec(model),
            StageKind::VizCode => viz_coder_spec(model),
        };
        let tools = if stage.sandbox_enabled() {
            vec![Arc::clone(sandbox_tool)]
        } else {
            Vec::new()
        };
        Ok(self.factory.build(spec, tools)?)
    }

    /// Streams one stage to completion, forwarding chunks in arrival
    /// order and returning the accumulated text.
    async fn run_stage(
        &self,
        stage: StageKind,
        agent: &dyn Agent,
        prompt: &str,
        sink: &mut dyn PipelineSink,
    ) -> Result<String, VizflowError> {
        info!(stage = %stage, agent = %agent.spec().name, "stage started");
        sink.stage_started(stage);

        let mut stream = if stage.sandbox_enabled() {
            agent.act(prompt).await?
        } else {
            agent.chat(prompt).await?
        };

        let mut accumulated = String::new();
        while let Some(chunk) = stream.next().await {
            let text = chunk?;
            sink.chunk(stage, &text);
            accumulated.push_str(&text);
        }

        info!(stage = %stage, chars = accumulated.len(), "stage finished");
        Ok(accumulated)
    }
}
