//! Chunked assistant-message stream and the after-model routing scan.
//!
//! A model invocation produces one assistant message as a live sequence of
//! [`MessageChunk`]s over a bounded channel. [`MessageStream`] is one-shot and
//! non-restartable; [`close`](MessageStream::close) releases the channel and
//! is called on every exit path of the scan, early decisions and errors
//! included. [`scan_model_stream`] fixes the routing decision as soon as a
//! tool call is observed but still drains the remainder so the full message
//! can be assembled into history.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::react::AfterModel;

/// One increment of a streamed assistant message.
#[derive(Debug, Clone, Default)]
pub struct MessageChunk {
    /// Content delta.
    pub content: String,
    /// Tool calls first observed in this chunk.
    pub tool_calls: Vec<ToolCall>,
}

impl MessageChunk {
    /// Creates a text-only chunk.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// Creates a chunk carrying tool calls.
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            tool_calls,
        }
    }
}

/// One-shot stream of the chunks of a single assistant message.
///
/// Producers hold the sender half; the loop consumes via
/// [`recv`](Self::recv) and releases with [`close`](Self::close). Dropping
/// the stream also releases it.
#[derive(Debug)]
pub struct MessageStream {
    rx: mpsc::Receiver<Result<MessageChunk, AgentError>>,
}

impl MessageStream {
    /// Creates a producer/consumer pair with the given channel capacity.
    pub fn channel(
        buffer: usize,
    ) -> (mpsc::Sender<Result<MessageChunk, AgentError>>, MessageStream) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, MessageStream { rx })
    }

    /// Builds an already-complete stream from a fixed chunk sequence.
    ///
    /// Useful for model clients that have the whole reply at hand (mocks,
    /// non-streaming backends).
    pub fn from_chunks(chunks: Vec<MessageChunk>) -> MessageStream {
        let (tx, stream) = MessageStream::channel(chunks.len());
        for chunk in chunks {
            // capacity == len, so try_send cannot fail
            let _ = tx.try_send(Ok(chunk));
        }
        stream
    }

    /// Receives the next chunk; `None` once the producer is done.
    pub async fn recv(&mut self) -> Option<Result<MessageChunk, AgentError>> {
        self.rx.recv().await
    }

    /// Closes the receiving half so producers stop; idempotent.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// Converts into a `tokio_stream` adapter for combinator-style consumers.
    pub fn into_stream(self) -> ReceiverStream<Result<MessageChunk, AgentError>> {
        ReceiverStream::new(self.rx)
    }
}

/// Routing decision derived from a fully drained chunk sequence.
///
/// Pure counterpart of [`scan_model_stream`]: scanning a live stream chunk by
/// chunk and re-scanning the drained sequence yield the same decision.
pub fn route_for_chunks(chunks: &[MessageChunk]) -> AfterModel {
    if chunks.iter().any(|c| !c.tool_calls.is_empty()) {
        AfterModel::Tools
    } else {
        AfterModel::End
    }
}

/// Consumes a model stream: decides the after-model route and assembles the
/// full assistant message.
///
/// The route is fixed on the first chunk that carries a tool call; scanning
/// stops there but the remainder is still drained so the assembled message is
/// complete. The stream is closed on every exit path, including errors.
pub async fn scan_model_stream(
    stream: &mut MessageStream,
) -> Result<(AfterModel, Message), AgentError> {
    scan_model_stream_with(stream, |_| {}).await
}

/// Like [`scan_model_stream`], invoking `on_chunk` for each received chunk so
/// callers can forward increments to downstream consumers.
pub async fn scan_model_stream_with(
    stream: &mut MessageStream,
    mut on_chunk: impl FnMut(&MessageChunk),
) -> Result<(AfterModel, Message), AgentError> {
    let mut route = AfterModel::End;
    let mut content = String::new();
    let mut tool_calls: Vec<ToolCall> = vec![];

    while let Some(next) = stream.recv().await {
        let chunk = match next {
            Ok(chunk) => chunk,
            Err(e) => {
                stream.close();
                return Err(e);
            }
        };
        on_chunk(&chunk);
        if route == AfterModel::End && !chunk.tool_calls.is_empty() {
            route = AfterModel::Tools;
        }
        content.push_str(&chunk.content);
        tool_calls.extend(chunk.tool_calls);
    }
    stream.close();

    Ok((route, Message::assistant_with_tool_calls(content, tool_calls)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: "{}".into(),
        }
    }

    /// **Scenario**: a text-only stream routes to End with the full content.
    #[tokio::test]
    async fn scan_text_only_stream_routes_end() {
        let mut stream = MessageStream::from_chunks(vec![
            MessageChunk::text("Hel"),
            MessageChunk::text("lo."),
        ]);
        let (route, msg) = scan_model_stream(&mut stream).await.unwrap();
        assert_eq!(route, AfterModel::End);
        assert_eq!(msg.content, "Hello.");
        assert!(msg.tool_calls.is_empty());
    }

    /// **Scenario**: a tool-call chunk routes to Tools and trailing content is
    /// still drained into the assembled message.
    #[tokio::test]
    async fn scan_tool_call_stream_routes_tools_and_drains_remainder() {
        let mut stream = MessageStream::from_chunks(vec![
            MessageChunk::text("Checking "),
            MessageChunk::tool_calls(vec![call("c1", "get_time")]),
            MessageChunk::text("the time."),
        ]);
        let (route, msg) = scan_model_stream(&mut stream).await.unwrap();
        assert_eq!(route, AfterModel::Tools);
        assert_eq!(msg.content, "Checking the time.");
        assert_eq!(msg.tool_calls.len(), 1);
        assert_eq!(msg.tool_calls[0].id, "c1");
    }

    /// **Scenario**: re-running the routing over the drained chunk sequence
    /// matches the live scan decision, with and without tool calls.
    #[tokio::test]
    async fn route_for_chunks_matches_live_scan() {
        let with_tools = vec![
            MessageChunk::text("a"),
            MessageChunk::tool_calls(vec![call("c1", "t")]),
        ];
        let without_tools = vec![MessageChunk::text("a"), MessageChunk::text("b")];

        for chunks in [with_tools, without_tools] {
            let replay = route_for_chunks(&chunks);
            let mut stream = MessageStream::from_chunks(chunks);
            let (live, _) = scan_model_stream(&mut stream).await.unwrap();
            assert_eq!(live, replay);
        }
    }

    /// **Scenario**: a mid-stream error propagates and the stream is closed so
    /// the producer's next send fails.
    #[tokio::test]
    async fn scan_error_closes_stream_and_propagates() {
        let (tx, mut stream) = MessageStream::channel(4);
        tx.try_send(Ok(MessageChunk::text("partial"))).unwrap();
        tx.try_send(Err(AgentError::Model("connection reset".into())))
            .unwrap();

        let err = scan_model_stream(&mut stream).await.unwrap_err();
        assert!(matches!(err, AgentError::Model(_)));
        assert!(tx.try_send(Ok(MessageChunk::text("late"))).is_err());
    }
}
