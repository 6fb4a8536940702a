//! Loop execution error types.
//!
//! Returned by the model step, tool step, and runner. None of these are
//! retried inside the loop; they propagate up through the run invocation.

use thiserror::Error;

use crate::tool_source::ToolSourceError;

/// Fatal error from one run of the agent loop.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The iteration budget reached zero before a required model invocation.
    #[error("exceeds max iterations")]
    ExceedMaxIterations,

    /// A before/after-model hook failed; the step aborts, later hooks do not run.
    #[error("model hook failed: {0}")]
    Hook(String),

    /// Building the static tool catalog at run setup failed.
    #[error("tool catalog generation failed: {0}")]
    ToolCatalog(#[source] ToolSourceError),

    /// Model invocation or its chunk stream failed.
    #[error("model invocation failed: {0}")]
    Model(String),

    /// A tool call failed during the tool step.
    #[error("tool call failed: {0}")]
    Tool(#[source] ToolSourceError),
}
