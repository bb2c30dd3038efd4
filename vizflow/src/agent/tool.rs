//! Tool surface exposed to agents.

use crate::exec::Sandbox;
use serde_json::json;

/// A named tool an agent can invoke with a code string.
///
/// Invocation is synchronous and infallible at this boundary: failures
/// are encoded in the returned status text, which the agent runtime feeds
/// back into its own reasoning loop.
pub trait ScriptTool: Send + Sync {
    /// Wire name of the tool.
    fn name(&self) -> &str;

    /// One-line description shown to the model.
    fn description(&self) -> &str;

    /// Invokes the tool with a code string, returning status text.
    fn invoke(&self, code: &str) -> String;

    /// JSON-schema description of the tool for the provider wire format.
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "The script to execute against the shared context",
                    }
                },
                "required": ["code"],
            }),
        }
    }
}

/// Provider-facing tool description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    /// Wire name.
    pub name: String,
    /// Model-facing description.
    pub description: String,
    /// JSON schema for the arguments object.
    pub parameters: serde_json::Value,
}

/// The sandbox exposed as the single `execute_script` tool.
#[derive(Debug, Clone)]
pub struct SandboxTool {
    sandbox: Sandbox,
}

impl SandboxTool {
    /// Wraps a sandbox.
    #[must_use]
    pub const fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

impl ScriptTool for SandboxTool {
    fn name(&self) -> &str {
        "execute_script"
    }

    fn description(&self) -> &str {
        "Execute a transform script against the shared context. Variables persist across calls; 'df' is the dataset."
    }

    fn invoke(&self, code: &str) -> String {
        self.sandbox.execute(code).status_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextStore;
    use crate::dataset::{Frame, Scalar};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn tool() -> (SandboxTool, Arc<Mutex<ContextStore>>) {
        let mut frame = Frame::new(vec!["a".to_string()]).unwrap();
        frame.push_row(vec![Scalar::Int(1)]).unwrap();
        let store = Arc::new(Mutex::new(ContextStore::seeded(frame)));
        (SandboxTool::new(Sandbox::new(Arc::clone(&store))), store)
    }

    #[test]
    fn test_success_status_text() {
        let (tool, store) = tool();
        let status = tool.invoke("df = df.assign(b = 2)");
        assert_eq!(status, "Code executed successfully.");
        assert_eq!(store.lock().primary().unwrap().n_cols(), 2);
    }

    #[test]
    fn test_failure_status_text() {
        let (tool, _store) = tool();
        let status = tool.invoke("x = 1 / 0");
        assert!(status.starts_with("Error executing code:"));
        assert!(status.contains("division by zero"));
    }

    #[test]
    fn test_tool_spec_schema() {
        let (tool, _store) = tool();
        let spec = tool.spec();
        assert_eq!(spec.name, "execute_script");
        assert_eq!(spec.parameters["required"][0], "code");
    }
}
