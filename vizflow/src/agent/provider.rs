//! OpenAI-compatible chat-completions agent with SSE streaming and tool
//! invocation.
//!
//! Works against OpenAI and any compatible serving endpoint. The runtime
//! loop is: stream one completion; if the model finished by requesting
//! tool calls, execute them, append the results to the conversation and
//! stream again; otherwise the conversation is done.

use super::{Agent, AgentSpec, ScriptTool, TextStream};
use crate::errors::AgentError;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Connection settings for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token, when the endpoint needs one.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            timeout_secs: 300,
        }
    }
}

impl ProviderConfig {
    /// Reads `VIZFLOW_BASE_URL` and `VIZFLOW_API_KEY` from the
    /// environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("VIZFLOW_BASE_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(key) = std::env::var("VIZFLOW_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        config
    }
}

/// An agent backed by an OpenAI-compatible chat endpoint.
pub struct ChatProviderAgent {
    spec: AgentSpec,
    tools: Vec<Arc<dyn ScriptTool>>,
    client: Client,
    config: ProviderConfig,
}

impl ChatProviderAgent {
    /// Creates an agent from its spec, tool list, and connection config.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Other` when the HTTP client cannot be built.
    pub fn new(
        spec: AgentSpec,
        tools: Vec<Arc<dyn ScriptTool>>,
        config: ProviderConfig,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            spec,
            tools,
            client,
            config,
        })
    }

    fn conversation(&self, prompt: &str) -> Vec<WireMessage> {
        vec![
            WireMessage::system(&self.spec.description),
            WireMessage::user(prompt),
        ]
    }
}

#[async_trait]
impl Agent for ChatProviderAgent {
    fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    async fn act(&self, prompt: &str) -> Result<TextStream, AgentError> {
        Ok(run_conversation(
            self.client.clone(),
            self.config.clone(),
            self.spec.model.clone(),
            self.conversation(prompt),
            self.tools.clone(),
        ))
    }

    async fn chat(&self, prompt: &str) -> Result<TextStream, AgentError> {
        Ok(run_conversation(
            self.client.clone(),
            self.config.clone(),
            self.spec.model.clone(),
            self.conversation(prompt),
            Vec::new(),
        ))
    }
}

/// Builds [`ChatProviderAgent`]s sharing one connection config.
#[derive(Debug, Clone, Default)]
pub struct ProviderAgentFactory {
    config: ProviderConfig,
}

impl ProviderAgentFactory {
    /// Creates a factory over the given connection config.
    #[must_use]
    pub const fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

impl super::AgentFactory for ProviderAgentFactory {
    fn build(
        &self,
        spec: AgentSpec,
        tools: Vec<Arc<dyn ScriptTool>>,
    ) -> Result<Arc<dyn Agent>, AgentError> {
        Ok(Arc::new(ChatProviderAgent::new(
            spec,
            tools,
            self.config.clone(),
        )?))
    }
}

fn run_conversation(
    client: Client,
    config: ProviderConfig,
    model: String,
    mut messages: Vec<WireMessage>,
    tools: Vec<Arc<dyn ScriptTool>>,
) -> TextStream {
    Box::pin(async_stream::stream! {
        let wire_tools: Option<Vec<WireTool>> = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(|t| WireTool::from_spec(&t.spec())).collect())
        };

        loop {
            let request = ChatRequest {
                model: &model,
                messages: &messages,
                stream: true,
                tools: wire_tools.as_deref(),
            };

            let mut builder = client
                .post(format!("{}/chat/completions", config.base_url))
                .json(&request);
            if let Some(key) = &config.api_key {
                builder = builder.header("Authorization", format!("Bearer {key}"));
            }

            let response = match builder.send().await {
                Ok(r) => r,
                Err(e) => {
                    yield Err(AgentError::Network(e.to_string()));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                yield Err(if status.as_u16() == 401 {
                    AgentError::AuthenticationFailed
                } else {
                    AgentError::Api {
                        status: status.as_u16(),
                        message: body,
                    }
                });
                return;
            }

            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();
            let mut pending: Vec<PendingToolCall> = Vec::new();
            let mut content = String::new();
            let mut finish: Option<String> = None;

            'receive: while let Some(chunk) = byte_stream.next().await {
                let bytes = match chunk {
                    Ok(b) => b,
                    Err(e) => {
                        yield Err(AgentError::Network(e.to_string()));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(pos) = buffer.find("\n\n") {
                    let event: String = buffer.drain(..pos + 2).collect();
                    for data in sse_data_lines(&event) {
                        if data == "[DONE]" {
                            break 'receive;
                        }
                        let parsed: StreamChunk = match serde_json::from_str(data) {
                            Ok(p) => p,
                            Err(e) => {
                                yield Err(AgentError::Parse(format!(
                                    "bad stream chunk: {e}"
                                )));
                                return;
                            }
                        };
                        for choice in parsed.choices {
                            if let Some(text) = choice.delta.content {
                                if !text.is_empty() {
                                    content.push_str(&text);
                                    yield Ok(text);
                                }
                            }
                            for delta in choice.delta.tool_calls.unwrap_or_default() {
                                accumulate_tool_delta(&mut pending, delta);
                            }
                            if let Some(reason) = choice.finish_reason {
                                finish = Some(reason);
                            }
                        }
                    }
                }
            }

            if finish.as_deref() == Some("tool_calls") && !pending.is_empty() {
                debug!(calls = pending.len(), "model requested tool calls");
                messages.push(WireMessage::assistant_calls(&content, &pending));
                for call in pending.drain(..) {
                    let result = dispatch_tool(&tools, &call.name, &call.arguments);
                    messages.push(WireMessage::tool_result(&call.id, &result));
                }
                continue;
            }
            return;
        }
    })
}

/// Extracts the `data:` payloads from one SSE event block.
fn sse_data_lines(event: &str) -> Vec<&str> {
    event
        .lines()
        .filter_map(|line| line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")))
        .map(str::trim)
        .filter(|data| !data.is_empty())
        .collect()
}

/// A tool call assembled from streaming deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PendingToolCall {
    id: String,
    name: String,
    arguments: String,
}

fn accumulate_tool_delta(pending: &mut Vec<PendingToolCall>, delta: ToolCallDelta) {
    let index = delta.index;
    while pending.len() <= index {
        pending.push(PendingToolCall::default());
    }
    let slot = &mut pending[index];
    if let Some(id) = delta.id {
        slot.id = id;
    }
    if let Some(function) = delta.function {
        if let Some(name) = function.name {
            slot.name = name;
        }
        if let Some(arguments) = function.arguments {
            slot.arguments.push_str(&arguments);
        }
    }
}

fn dispatch_tool(tools: &[Arc<dyn ScriptTool>], name: &str, arguments: &str) -> String {
    let Some(tool) = tools.iter().find(|t| t.name() == name) else {
        return format!("Unknown tool: {name}");
    };
    let code = serde_json::from_str::<serde_json::Value>(arguments)
        .ok()
        .and_then(|v| v.get("code").and_then(|c| c.as_str()).map(ToString::to_string));
    match code {
        Some(code) => tool.invoke(&code),
        None => "Tool arguments must be a JSON object with a \"code\" string.".to_string(),
    }
}

// ---------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [WireTool]>,
}

#[derive(Debug, Clone, Serialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn assistant_calls(content: &str, calls: &[PendingToolCall]) -> Self {
        Self {
            role: "assistant".to_string(),
            content: if content.is_empty() {
                None
            } else {
                Some(content.to_string())
            },
            tool_calls: Some(
                calls
                    .iter()
                    .map(|c| WireToolCall {
                        id: c.id.clone(),
                        kind: "function".to_string(),
                        function: WireFunctionCall {
                            name: c.name.clone(),
                            arguments: c.arguments.clone(),
                        },
                    })
                    .collect(),
            ),
            tool_call_id: None,
        }
    }

    fn tool_result(tool_call_id: &str, content: &str) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.to_string()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Clone, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionDef,
}

impl WireTool {
    fn from_spec(spec: &super::ToolSpec) -> Self {
        Self {
            kind: "function".to_string(),
            function: WireFunctionDef {
                name: spec.name.clone(),
                description: spec.description.clone(),
                parameters: spec.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct WireFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    #[serde(default)]
    index: usize,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    function: Option<FunctionDelta>,
}

#[derive(Debug, Deserialize)]
struct FunctionDelta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct EchoTool;

    impl ScriptTool for EchoTool {
        fn name(&self) -> &str {
            "execute_script"
        }
        fn description(&self) -> &str {
            "echo"
        }
        fn invoke(&self, code: &str) -> String {
            format!("ran: {code}")
        }
    }

    #[test]
    fn test_request_serialization_shape() {
        let messages = vec![WireMessage::system("sys"), WireMessage::user("hi")];
        let tools = vec![WireTool::from_spec(&EchoTool.spec())];
        let request = ChatRequest {
            model: "gpt-4o",
            messages: &messages,
            stream: true,
            tools: Some(&tools),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["stream"], true);
        assert_eq!(value["messages"][0]["role"], "system");
        assert!(value["messages"][0].get("tool_calls").is_none());
        assert_eq!(value["tools"][0]["type"], "function");
        assert_eq!(value["tools"][0]["function"]["name"], "execute_script");
    }

    #[test]
    fn test_tool_delta_accumulation() {
        let mut pending = Vec::new();
        accumulate_tool_delta(
            &mut pending,
            ToolCallDelta {
                index: 0,
                id: Some("call_1".to_string()),
                function: Some(FunctionDelta {
                    name: Some("execute_script".to_string()),
                    arguments: Some("{\"code\":".to_string()),
                }),
            },
        );
        accumulate_tool_delta(
            &mut pending,
            ToolCallDelta {
                index: 0,
                id: None,
                function: Some(FunctionDelta {
                    name: None,
                    arguments: Some(" \"x = 1\"}".to_string()),
                }),
            },
        );

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "call_1");
        assert_eq!(pending[0].arguments, "{\"code\": \"x = 1\"}");
    }

    #[test]
    fn test_dispatch_tool() {
        let tools: Vec<Arc<dyn ScriptTool>> = vec![Arc::new(EchoTool)];
        let result = dispatch_tool(&tools, "execute_script", "{\"code\": \"x = 1\"}");
        assert_eq!(result, "ran: x = 1");

        let result = dispatch_tool(&tools, "other_tool", "{}");
        assert!(result.contains("Unknown tool"));

        let result = dispatch_tool(&tools, "execute_script", "not json");
        assert!(result.contains("JSON object"));
    }

    #[test]
    fn test_sse_data_lines() {
        let event = "event: message\ndata: {\"a\":1}\n";
        assert_eq!(sse_data_lines(event), vec!["{\"a\":1}"]);

        let done = "data: [DONE]\n";
        assert_eq!(sse_data_lines(done), vec!["[DONE]"]);
    }

    #[test]
    fn test_stream_chunk_parse() {
        let data = r#"{"choices":[{"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        let chunk: StreamChunk = serde_json::from_str(data).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hello"));

        let data = r#"{"choices":[{"delta":{"tool_calls":[{"index":0,"id":"c1","function":{"name":"execute_script","arguments":"{}"}}]},"finish_reason":"tool_calls"}]}"#;
        let chunk: StreamChunk = serde_json::from_str(data).unwrap();
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("tool_calls"));
    }

    #[tokio::test]
    async fn test_network_error_surfaces_in_stream() {
        let agent = ChatProviderAgent::new(
            AgentSpec::new("a", "assistant", "desc", "gpt-4o"),
            Vec::new(),
            ProviderConfig {
                base_url: "http://127.0.0.1:1".to_string(),
                api_key: None,
                timeout_secs: 1,
            },
        )
        .unwrap();

        let mut stream = agent.chat("hi").await.unwrap();
        let first = stream.next().await;
        assert!(matches!(first, Some(Err(AgentError::Network(_)))));
    }
}
