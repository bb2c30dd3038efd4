//! Scripted agent doubles for pipeline tests.

use crate::agent::{Agent, AgentFactory, AgentSpec, ScriptTool, TextStream};
use crate::errors::AgentError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// One recorded tool invocation: which agent ran what, and the status the
/// tool returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Name of the invoking agent.
    pub agent: String,
    /// The code string sent to the tool.
    pub code: String,
    /// Status text the tool returned.
    pub status: String,
}

/// Shared log of tool invocations across scripted agents.
pub type InvocationLog = Arc<Mutex<Vec<ToolInvocation>>>;

/// What a scripted agent does when invoked: first run each configured
/// script through its tool (when it has one), then stream the configured
/// chunks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBehavior {
    /// Scripts sent to the tool, in order.
    pub scripts: Vec<String>,
    /// Text chunks streamed to the caller, in order.
    pub chunks: Vec<String>,
}

impl ScriptedBehavior {
    /// A behavior that only streams text.
    #[must_use]
    pub fn says(chunks: &[&str]) -> Self {
        Self {
            scripts: Vec::new(),
            chunks: chunks.iter().map(ToString::to_string).collect(),
        }
    }

    /// Adds a script to run through the tool before streaming.
    #[must_use]
    pub fn runs(mut self, script: &str) -> Self {
        self.scripts.push(script.to_string());
        self
    }
}

/// An agent that plays back a [`ScriptedBehavior`].
pub struct ScriptedAgent {
    spec: AgentSpec,
    behavior: ScriptedBehavior,
    tools: Vec<Arc<dyn ScriptTool>>,
    log: InvocationLog,
}

impl ScriptedAgent {
    /// Creates a scripted agent.
    #[must_use]
    pub fn new(
        spec: AgentSpec,
        behavior: ScriptedBehavior,
        tools: Vec<Arc<dyn ScriptTool>>,
        log: InvocationLog,
    ) -> Self {
        Self {
            spec,
            behavior,
            tools,
            log,
        }
    }

    fn stream_chunks(&self) -> TextStream {
        let chunks: Vec<Result<String, AgentError>> =
            self.behavior.chunks.iter().cloned().map(Ok).collect();
        Box::pin(futures::stream::iter(chunks))
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    async fn act(&self, _prompt: &str) -> Result<TextStream, AgentError> {
        if let Some(tool) = self.tools.first() {
            for script in &self.behavior.scripts {
                let status = tool.invoke(script);
                self.log.lock().push(ToolInvocation {
                    agent: self.spec.name.clone(),
                    code: script.clone(),
                    status,
                });
            }
        }
        Ok(self.stream_chunks())
    }

    async fn chat(&self, _prompt: &str) -> Result<TextStream, AgentError> {
        // Text-only mode: scripts are never run, even when configured.
        Ok(self.stream_chunks())
    }
}

/// Builds [`ScriptedAgent`]s by agent name, recording prompts and tool
/// invocations for assertions.
#[derive(Default)]
pub struct ScriptedAgentFactory {
    behaviors: HashMap<String, ScriptedBehavior>,
    log: InvocationLog,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedAgentFactory {
    /// Creates a factory with no behaviors; unknown agents stream nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the behavior for an agent name.
    #[must_use]
    pub fn with_behavior(mut self, agent_name: &str, behavior: ScriptedBehavior) -> Self {
        self.behaviors.insert(agent_name.to_string(), behavior);
        self
    }

    /// The shared tool invocation log.
    #[must_use]
    pub fn log(&self) -> InvocationLog {
        Arc::clone(&self.log)
    }

    /// Prompts each built agent was eventually given, `(agent, prompt)`.
    #[must_use]
    pub fn prompts(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.prompts)
    }
}

impl AgentFactory for ScriptedAgentFactory {
    fn build(
        &self,
        spec: AgentSpec,
        tools: Vec<Arc<dyn ScriptTool>>,
    ) -> Result<Arc<dyn Agent>, AgentError> {
        let behavior = self.behaviors.get(&spec.name).cloned().unwrap_or_default();
        Ok(Arc::new(RecordingAgent {
            inner: ScriptedAgent::new(spec, behavior, tools, Arc::clone(&self.log)),
            prompts: Arc::clone(&self.prompts),
        }))
    }
}

/// Wraps a scripted agent to record the prompts it receives.
struct RecordingAgent {
    inner: ScriptedAgent,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl Agent for RecordingAgent {
    fn spec(&self) -> &AgentSpec {
        self.inner.spec()
    }

    async fn act(&self, prompt: &str) -> Result<TextStream, AgentError> {
        self.prompts
            .lock()
            .push((self.inner.spec.name.clone(), prompt.to_string()));
        self.inner.act(prompt).await
    }

    async fn chat(&self, prompt: &str) -> Result<TextStream, AgentError> {
        self.prompts
            .lock()
            .push((self.inner.spec.name.clone(), prompt.to_string()));
        self.inner.chat(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextStore;
    use crate::dataset::{Frame, Scalar};
    use crate::exec::Sandbox;
    use crate::agent::SandboxTool;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;

    fn sandbox_tool() -> (Arc<dyn ScriptTool>, Arc<Mutex<ContextStore>>) {
        let mut frame = Frame::new(vec!["a".to_string()]).unwrap();
        frame.push_row(vec![Scalar::Int(1)]).unwrap();
        let store = Arc::new(Mutex::new(ContextStore::seeded(frame)));
        (
            Arc::new(SandboxTool::new(Sandbox::new(Arc::clone(&store)))),
            store,
        )
    }

    #[tokio::test]
    async fn test_act_runs_scripts_then_streams() {
        let (tool, store) = sandbox_tool();
        let log: InvocationLog = Arc::default();
        let agent = ScriptedAgent::new(
            AgentSpec::new("A", "assistant", "d", "m"),
            ScriptedBehavior::says(&["done"]).runs("df = df.assign(b = 1)"),
            vec![tool],
            Arc::clone(&log),
        );

        let mut stream = agent.act("go").await.unwrap();
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            text.push_str(&chunk.unwrap());
        }

        assert_eq!(text, "done");
        assert_eq!(log.lock().len(), 1);
        assert_eq!(log.lock()[0].status, "Code executed successfully.");
        assert_eq!(store.lock().primary().unwrap().n_cols(), 2);
    }

    #[tokio::test]
    async fn test_chat_never_runs_scripts() {
        let (tool, store) = sandbox_tool();
        let log: InvocationLog = Arc::default();
        let agent = ScriptedAgent::new(
            AgentSpec::new("A", "assistant", "d", "m"),
            ScriptedBehavior::says(&["hi"]).runs("df = df.assign(b = 1)"),
            vec![tool],
            Arc::clone(&log),
        );

        let mut stream = agent.chat("go").await.unwrap();
        while stream.next().await.is_some() {}

        assert!(log.lock().is_empty());
        assert_eq!(store.lock().primary().unwrap().n_cols(), 1);
    }

    #[test]
    fn test_act_without_tools_skips_scripts() {
        let log: InvocationLog = Arc::default();
        let agent = ScriptedAgent::new(
            AgentSpec::new("A", "assistant", "d", "m"),
            ScriptedBehavior::says(&["x"]).runs("df = df.assign(b = 1)"),
            Vec::new(),
            Arc::clone(&log),
        );

        tokio_test::block_on(async {
            let mut stream = agent.act("go").await.unwrap();
            while stream.next().await.is_some() {}
        });

        assert!(log.lock().is_empty());
    }
}
