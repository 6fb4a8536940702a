//! Mock tool source for tests and examples.
//!
//! Fixed name→response table; records every call so tests can assert that no
//! requested call was skipped. Optional failure modes for catalog and call
//! errors.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool source: canned responses keyed by tool name.
///
/// **Interaction**: implements [`ToolSource`]; used by the tool step in tests.
pub struct MockToolSource {
    /// Tool name → fixed response text.
    responses: HashMap<String, String>,
    /// Names of tools whose calls fail with an execution error.
    failing: Vec<String>,
    /// When true, `list_tools` fails (catalog-generation error path).
    broken_catalog: bool,
    /// Names of tools called, in call order.
    calls: Mutex<Vec<String>>,
}

impl MockToolSource {
    /// Creates an empty source; add tools with [`with_tool`](Self::with_tool).
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            failing: vec![],
            broken_catalog: false,
            calls: Mutex::new(vec![]),
        }
    }

    /// Creates a source with one `get_time` tool returning a fixed timestamp.
    pub fn get_time_example() -> Self {
        Self::new().with_tool("get_time", "2025-01-29 12:00:00")
    }

    /// Adds a tool with a fixed response (builder).
    pub fn with_tool(mut self, name: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.insert(name.into(), response.into());
        self
    }

    /// Makes calls to `name` fail with an execution error (builder).
    pub fn with_failing_tool(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.responses.entry(name.clone()).or_default();
        self.failing.push(name);
        self
    }

    /// Creates a source whose `list_tools` fails.
    pub fn broken_catalog() -> Self {
        Self {
            broken_catalog: true,
            ..Self::new()
        }
    }

    /// Names of tools called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl Default for MockToolSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        if self.broken_catalog {
            return Err(ToolSourceError::Execution("catalog unavailable".into()));
        }
        let mut specs: Vec<ToolSpec> = self
            .responses
            .keys()
            .map(|name| ToolSpec {
                name: name.clone(),
                description: None,
                input_schema: serde_json::json!({ "type": "object" }),
            })
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(specs)
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: Value,
        _ctx: &ToolCallContext,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(name.to_string());
        if self.failing.iter().any(|f| f == name) {
            return Err(ToolSourceError::Execution(format!("{name} exploded")));
        }
        match self.responses.get(name) {
            Some(text) => Ok(ToolCallContent { text: text.clone() }),
            None => Err(ToolSourceError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LoopState, SharedState};

    fn ctx() -> ToolCallContext {
        ToolCallContext::new("c1", "a", SharedState::new(LoopState::new("a", 1)))
    }

    /// **Scenario**: calls are recorded in order and responses returned.
    #[tokio::test]
    async fn mock_tool_source_records_calls_and_returns_responses() {
        let tools = MockToolSource::get_time_example().with_tool("echo", "ok");
        let out = tools
            .call_tool("get_time", serde_json::json!({}), &ctx())
            .await
            .unwrap();
        assert_eq!(out.text, "2025-01-29 12:00:00");
        let _ = tools.call_tool("echo", serde_json::json!({}), &ctx()).await;
        assert_eq!(tools.calls(), vec!["get_time", "echo"]);
    }

    /// **Scenario**: unknown tool yields NotFound; broken catalog fails list_tools.
    #[tokio::test]
    async fn mock_tool_source_error_paths() {
        let tools = MockToolSource::new();
        let err = tools
            .call_tool("nope", serde_json::json!({}), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(_)));
        assert!(MockToolSource::broken_catalog().list_tools().await.is_err());
    }
}
