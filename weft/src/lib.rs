//! Weft: the ReAct control loop.
//!
//! An iterative cycle in which a language model proposes either a final
//! answer or a set of tool invocations, a tool step runs those invocations,
//! and the results are fed back to the model until a termination condition is
//! reached. The crate owns the loop itself: the routing state machine, the
//! per-run state threaded through both steps, the direct-return short-circuit,
//! and the iteration bound. It depends on collaborator traits for model and
//! tool invocation.
//!
//! # Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use weft::{Message, MockLlm, MockToolSource, ReactConfig, ReactRunner};
//!
//! let config = ReactConfig::new(
//!     Arc::new(MockLlm::first_tools_then_end()),
//!     Arc::new(MockToolSource::get_time_example()),
//! )
//! .with_agent_name("clock");
//! let runner = ReactRunner::new(config).await?;
//! let outcome = runner.invoke(vec![Message::user("What time is it?")]).await?;
//! ```
//!
//! # Main types
//!
//! - **[`ReactRunner`]** builds the steps from a [`ReactConfig`] and drives
//!   the loop; `invoke`, `run_with_events`, `stream`.
//! - **[`ModelStep`] / [`ToolStep`]** are the two stages of one iteration.
//! - **[`SharedState`]** is the funneled accessor around [`LoopState`].
//! - **[`LlmClient`] / [`ToolSource`]** are collaborator contracts, with
//!   [`MockLlm`] / [`MockToolSource`] for tests.
//! - **[`MessageStream`]** is a one-shot chunk stream of a model reply.

pub mod error;
pub mod llm;
pub mod message;
pub mod react;
pub mod state;
pub mod stream;
pub mod tool_source;

pub use error::AgentError;
pub use llm::{LlmClient, MockLlm};
pub use message::{Message, Role, ToolCall};
pub use react::{
    route_after_tools, short_circuit_filter, AfterModel, AfterTools, LoopEvent, ModelHook,
    ModelStep, ReactConfig, ReactRunner, RunOutcome, ToolStep, DEFAULT_MAX_ITERATIONS,
};
pub use state::{LoopState, SharedState, ToolAction};
pub use stream::{
    route_for_chunks, scan_model_stream, scan_model_stream_with, MessageChunk, MessageStream,
};
pub use tool_source::{
    MockToolSource, ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec,
};
