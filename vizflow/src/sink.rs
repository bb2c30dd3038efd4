//! Chunk sinks: where streamed stage output goes.

use crate::pipeline::StageKind;
use std::io::Write as _;

/// Receives stage lifecycle notices and streamed text chunks, in arrival
/// order.
pub trait PipelineSink: Send {
    /// A stage is about to stream.
    fn stage_started(&mut self, stage: StageKind);

    /// One text chunk from the active stage.
    fn chunk(&mut self, stage: StageKind, text: &str);
}

/// Prints chunks to stdout as they arrive, flushing per chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl PipelineSink for StdoutSink {
    fn stage_started(&mut self, stage: StageKind) {
        println!("\n[Stage: {}]", stage.title());
    }

    fn chunk(&mut self, _stage: StageKind, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PipelineSink for NullSink {
    fn stage_started(&mut self, _stage: StageKind) {}

    fn chunk(&mut self, _stage: StageKind, _text: &str) {}
}

/// Collects chunks per stage, for tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Vec<(StageKind, String)>,
    started: Vec<StageKind>,
}

impl CollectingSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All chunks in arrival order.
    #[must_use]
    pub fn chunks(&self) -> &[(StageKind, String)] {
        &self.events
    }

    /// Stage starts in order.
    #[must_use]
    pub fn started(&self) -> &[StageKind] {
        &self.started
    }

    /// Concatenated text for one stage, in arrival order.
    #[must_use]
    pub fn stage_text(&self, stage: StageKind) -> String {
        self.events
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, t)| t.as_str())
            .collect()
    }
}

impl PipelineSink for CollectingSink {
    fn stage_started(&mut self, stage: StageKind) {
        self.started.push(stage);
    }

    fn chunk(&mut self, stage: StageKind, text: &str) {
        self.events.push((stage, text.to_string()));
    }
}
