//! Model client abstraction for the model step.
//!
//! The model step depends on a callable that turns the accumulated history
//! plus the static tool catalog into a live stream of one assistant message;
//! this module defines the trait and a scripted mock implementation.
//!
//! The tool catalog is derived once per run setup and passed on every
//! invocation, so implementations can bind tools ahead of time or per call.

mod mock;

pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;
use crate::stream::MessageStream;
use crate::tool_source::ToolSpec;

/// Model client: given messages and the tool catalog, streams one assistant
/// message.
///
/// The returned [`MessageStream`] is one-shot; the loop scans it
/// incrementally for tool calls and drains it to assemble the full reply.
/// Implementations surface transport or decode failures either from
/// `invoke_stream` itself or as an `Err` chunk inside the stream.
///
/// **Interaction**: used by the model step; mocked in tests by [`MockLlm`].
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages and tools, return the reply stream.
    async fn invoke_stream(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<MessageStream, AgentError>;
}
