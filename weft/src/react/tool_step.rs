//! Tool step: direct-return marking and per-call execution.
//!
//! Re-reads the latest assistant message fresh from shared history (hooks may
//! have rewritten it after the model reply was scanned), records the
//! direct-return call id when a configured tool is requested, then executes
//! every call in order through the tool source.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::message::{Message, Role};
use crate::state::SharedState;
use crate::tool_source::{ToolCallContext, ToolSource};

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Parses tool-call argument text to a JSON value. Logs a warning and falls
/// back to an empty object on malformed input.
fn parse_tool_arguments(arguments: &str) -> Value {
    if arguments.trim().is_empty() {
        return serde_json::json!({});
    }
    match serde_json::from_str(arguments) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, arguments = %truncate_for_log(arguments, 120), "tool arguments JSON parse failed, using empty object");
            serde_json::json!({})
        }
    }
}

/// Tool step of the loop.
///
/// Holds the tool collaborator and the set of tool names configured for
/// direct return.
#[derive(Clone)]
pub struct ToolStep {
    tools: Arc<dyn ToolSource>,
    return_directly: HashSet<String>,
}

impl ToolStep {
    /// Creates a tool step with the given collaborator and direct-return set.
    pub fn new(tools: Arc<dyn ToolSource>, return_directly: HashSet<String>) -> Self {
        Self {
            tools,
            return_directly,
        }
    }

    /// True when at least one tool is configured direct-return.
    pub fn direct_return_configured(&self) -> bool {
        !self.return_directly.is_empty()
    }

    /// Executes the tool calls of the latest assistant message.
    ///
    /// Direct-return policy: the **first** call in iteration order whose tool
    /// is configured direct-return sets `direct_return_call_id`; later
    /// matches in the same run are ignored. Every requested call is executed
    /// regardless; marking never skips execution.
    ///
    /// Returns one `Role::Tool` message per call, tagged with the call id it
    /// answers.
    ///
    /// # Errors
    ///
    /// Tool call failures propagate as `AgentError::Tool`; nothing is retried.
    pub async fn run(&self, state: &SharedState) -> Result<Vec<Message>, AgentError> {
        let (agent_name, call_msg) = state.process(|st| {
            let msg = st
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::Assistant)
                .cloned()
                .unwrap_or_else(|| Message::assistant(""));
            if !self.return_directly.is_empty() {
                for tc in &msg.tool_calls {
                    if self.return_directly.contains(&tc.name) && !st.has_direct_return {
                        st.direct_return_call_id = Some(tc.id.clone());
                        st.has_direct_return = true;
                    }
                }
            }
            (st.agent_name.clone(), msg)
        });

        let mut results = Vec::with_capacity(call_msg.tool_calls.len());
        for tc in &call_msg.tool_calls {
            let arguments = parse_tool_arguments(&tc.arguments);
            let ctx = ToolCallContext::new(tc.id.clone(), agent_name.clone(), state.clone());
            let content = self
                .tools
                .call_tool(&tc.name, arguments, &ctx)
                .await
                .map_err(AgentError::Tool)?;
            debug!(
                agent = %agent_name,
                tool = %tc.name,
                call_id = %tc.id,
                result = %truncate_for_log(&content.text, 120),
                "tool call finished"
            );
            results.push(Message::tool(tc.id.clone(), content.text));
        }
        Ok(results)
    }
}
