//! Agent interface and the chat-provider implementation.
//!
//! Agents are external collaborators: given a prompt and a tool list they
//! produce an ordered stream of text chunks and decide for themselves
//! when to invoke a tool with a code string. The orchestrator consumes
//! the chunks; it never drives tool invocation directly.

mod provider;
mod roles;
mod tool;

pub use provider::{ChatProviderAgent, ProviderAgentFactory, ProviderConfig};
pub use roles::{analyzer_spec, preprocessor_spec, suggestion_spec, viz_coder_spec};
pub use tool::{SandboxTool, ScriptTool, ToolSpec};

use crate::errors::AgentError;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// An ordered, finite, consumed-once stream of text chunks.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AgentError>> + Send>>;

/// Static configuration an agent is constructed with.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    /// Display name, e.g. `PreprocessingAgent`.
    pub name: String,
    /// Conversation role, e.g. `assistant`.
    pub role: String,
    /// System-prompt description of the agent's job.
    pub description: String,
    /// Model identifier to run against.
    pub model: String,
}

impl AgentSpec {
    /// Creates a spec.
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        description: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            description: description.into(),
            model: model.into(),
        }
    }
}

/// The agent contract the orchestrator depends on.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The agent's static configuration.
    fn spec(&self) -> &AgentSpec;

    /// Runs the agent with its tool list available.
    ///
    /// The runtime may invoke tools any number of times while producing
    /// the stream; each tool result feeds back into its own reasoning.
    async fn act(&self, prompt: &str) -> Result<TextStream, AgentError>;

    /// Runs the agent in pure text mode, tools withheld.
    async fn chat(&self, prompt: &str) -> Result<TextStream, AgentError>;
}

/// Builds one agent per stage from its spec and tool list.
///
/// The orchestrator depends on this seam; production wires it to
/// [`ProviderAgentFactory`], tests to a scripted factory.
pub trait AgentFactory: Send + Sync {
    /// Constructs an agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying runtime cannot be built.
    fn build(
        &self,
        spec: AgentSpec,
        tools: Vec<Arc<dyn ScriptTool>>,
    ) -> Result<Arc<dyn Agent>, AgentError>;
}
