//! Test doubles for pipeline and agent tests.

mod mocks;

pub use mocks::{
    InvocationLog, ScriptedAgent, ScriptedAgentFactory, ScriptedBehavior, ToolInvocation,
};
