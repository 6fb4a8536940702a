//! Tool source abstraction: list tools and call a tool.
//!
//! The loop depends on `ToolSource` instead of a concrete tool registry. The
//! runner uses `list_tools()` once per setup to derive the static catalog
//! bound to the model; the tool step uses `call_tool()` per requested call.
//!
//! Tools receive a [`ToolCallContext`] that names the call and the run and
//! exposes exactly one piece of loop state: the out-of-band action deposit
//! (see [`ToolAction`](crate::state::ToolAction)).

mod mock;

pub use mock::MockToolSource;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::state::{SharedState, ToolAction};

/// Tool specification exposed to the model as part of the static catalog.
///
/// **Interaction**: returned by `ToolSource::list_tools()`; the runner passes
/// the full list to `LlmClient::invoke_stream` on every model step.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name, as the model must reference it in tool calls.
    pub name: String,
    /// Human-readable description for the model.
    pub description: Option<String>,
    /// JSON Schema for the arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
///
/// **Interaction**: returned by `ToolSource::call_tool()`; the tool step maps
/// it to a `Role::Tool` message tagged with the originating call id.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    /// Result text.
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: `list_tools` failures surface as
/// `AgentError::ToolCatalog` at run setup; `call_tool` failures surface as
/// `AgentError::Tool` from the tool step.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("execution error: {0}")]
    Execution(String),
}

/// Per-call context handed to tool implementations.
///
/// Identifies the call and the run, and carries the only state surface tools
/// may touch: depositing an out-of-band [`ToolAction`] for an async consumer.
/// Everything else in the loop state stays behind the step entry points.
#[derive(Clone)]
pub struct ToolCallContext {
    /// Id of the tool call being executed.
    pub call_id: String,
    /// Label of the run this call belongs to.
    pub agent_name: String,
    state: SharedState,
}

impl ToolCallContext {
    /// Creates a context for one call of one run.
    pub fn new(
        call_id: impl Into<String>,
        agent_name: impl Into<String>,
        state: SharedState,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            agent_name: agent_name.into(),
            state,
        }
    }

    /// Deposits an action for `tool_name`, to be popped by its consumer.
    pub fn send_action(&self, tool_name: impl Into<String>, action: ToolAction) {
        self.state.send_tool_action(tool_name, action);
    }
}

/// Tool source: list tools and call a tool.
///
/// The loop depends on this instead of a concrete registry. Implementations:
/// [`MockToolSource`] for tests; real registries, RPC bridges, or protocol
/// clients in applications.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List available tools; called once per runner setup to build the catalog.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with parsed JSON arguments.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        ctx: &ToolCallContext,
    ) -> Result<ToolCallContent, ToolSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of each ToolSourceError variant contains expected keywords.
    #[test]
    fn tool_source_error_display_all_variants() {
        let s = ToolSourceError::NotFound("x".into()).to_string();
        assert!(s.to_lowercase().contains("not found"), "{}", s);
        let s = ToolSourceError::InvalidInput("bad".into()).to_string();
        assert!(s.to_lowercase().contains("invalid"), "{}", s);
        let s = ToolSourceError::Execution("net".into()).to_string();
        assert!(s.to_lowercase().contains("execution"), "{}", s);
    }

    /// **Scenario**: ToolSpec and ToolCallContent can be constructed and cloned.
    #[test]
    fn tool_spec_and_tool_call_content_construct_and_clone() {
        let spec = ToolSpec {
            name: "get_time".into(),
            description: Some("Get time".into()),
            input_schema: serde_json::json!({}),
        };
        assert_eq!(spec.name, "get_time");
        let _ = spec.clone();
        let content = ToolCallContent {
            text: "12:00".into(),
        };
        assert_eq!(content.text, "12:00");
        let _ = content.clone();
    }
}
