//! Mock model client for tests and examples.
//!
//! Plays back a script of chunked responses, one per invocation; the last
//! script entry repeats once the script is exhausted, so an "always requests
//! a tool" model is a one-entry script. Records every request so tests can
//! assert what history the model actually saw.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::stream::{MessageChunk, MessageStream};
use crate::tool_source::ToolSpec;

use super::LlmClient;

/// Mock model: scripted chunk sequences, one per call.
///
/// Each invocation pops the next entry of the script (repeating the last one
/// when exhausted) and returns it as an already-complete [`MessageStream`].
///
/// **Interaction**: implements [`LlmClient`]; used by the model step in tests.
pub struct MockLlm {
    /// One chunk sequence per invocation; last entry repeats.
    responses: Vec<Vec<MessageChunk>>,
    /// Number of invocations so far.
    calls: AtomicUsize,
    /// Full history received per invocation.
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Creates a mock with an explicit response script.
    pub fn new(responses: Vec<Vec<MessageChunk>>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(vec![]),
        }
    }

    /// Creates a mock that returns assistant text and no tool calls (END path).
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::new(vec![vec![MessageChunk::text(content)]])
    }

    /// Creates a mock that always requests one call to `tool` (id "call-1").
    pub fn with_tool_call(tool: impl Into<String>) -> Self {
        let tool = tool.into();
        Self::new(vec![vec![
            MessageChunk::text(format!("I'll use {tool}.")),
            MessageChunk::tool_calls(vec![ToolCall {
                id: "call-1".into(),
                name: tool,
                arguments: "{}".into(),
            }]),
        ]])
    }

    /// Creates a mock that always requests the given calls in one message.
    pub fn with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::new(vec![vec![
            MessageChunk::text("Working on it."),
            MessageChunk::tool_calls(tool_calls),
        ]])
    }

    /// Creates a stateful mock: first call requests get_time, second answers
    /// with text only (multi-round loop tests).
    pub fn first_tools_then_end() -> Self {
        Self::new(vec![
            vec![
                MessageChunk::text("I'll check the time."),
                MessageChunk::tool_calls(vec![ToolCall {
                    id: "call-1".into(),
                    name: "get_time".into(),
                    arguments: "{}".into(),
                }]),
            ],
            vec![MessageChunk::text("The time is as above.")],
        ])
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Histories received so far, one per invocation.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke_stream(
        &self,
        messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<MessageStream, AgentError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(messages.to_vec());

        let chunks = self
            .responses
            .get(index.min(self.responses.len().saturating_sub(1)))
            .cloned()
            .unwrap_or_default();
        Ok(MessageStream::from_chunks(chunks))
    }
}
