//! The ReAct control loop: model step, tool step, and the routing in between.
//!
//! This module provides the loop's two decision points and the runner that
//! drives them:
//!
//! - **[`ModelStep`]**: enforces the iteration budget, appends input to
//!   history, runs before/after-model hooks, and invokes the model.
//! - **[`ToolStep`]**: re-reads the latest assistant message, marks a
//!   direct-return call, and executes every requested call.
//! - **[`AfterModel`] / [`AfterTools`]**: routing results of decisions (a)
//!   and (b); [`route_after_tools`] implements decision (b).
//! - **[`ReactRunner`]**: ties the steps into the full state machine with
//!   [`invoke`](ReactRunner::invoke), [`run_with_events`](ReactRunner::run_with_events)
//!   and [`stream`](ReactRunner::stream).
//!
//! # State machine
//!
//! ```text
//! START -> ModelStep
//! ModelStep -> [no tool call]      -> END (final answer = assistant message)
//! ModelStep -> [tool call seen]    -> ToolStep
//! ModelStep -> [budget exhausted]  -> FAIL(ExceedMaxIterations)
//! ToolStep  -> [no direct-return configured]             -> ModelStep
//! ToolStep  -> [direct-return configured, not triggered] -> ModelStep
//! ToolStep  -> [direct-return triggered]                 -> ShortCircuitExit -> END
//! ```

mod config;
mod model_step;
mod runner;
mod tool_step;

pub use config::{ModelHook, ReactConfig};
pub use model_step::ModelStep;
pub use runner::{short_circuit_filter, LoopEvent, ReactRunner, RunOutcome};
pub use tool_step::ToolStep;

use crate::state::SharedState;

/// Iteration bound applied when the configured maximum is zero or negative.
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// Routing decision after the model step (decision (a)).
///
/// - `Tools` - at least one tool call was observed in the reply stream
/// - `End` - the stream finished without any tool call; the run terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterModel {
    /// Route to the tool step.
    Tools,
    /// Terminate; the assembled assistant message is the final answer.
    End,
}

impl AfterModel {
    /// Returns a short label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::End => "end",
        }
    }
}

/// Routing decision after the tool step (decision (b)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterTools {
    /// Feed the tool results back into the model step.
    Model,
    /// Filter the result batch down to the direct-return match and end.
    ShortCircuit,
}

impl AfterTools {
    /// Returns a short label for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::ShortCircuit => "short_circuit",
        }
    }
}

/// Decision (b): route back to the model or to the short-circuit exit.
///
/// With no direct-return tool configured this is always `Model`: the classic
/// think-act-think cycle, bounded only by decision (a) or the iteration
/// budget. Otherwise the flag set by the tool step decides.
pub fn route_after_tools(direct_return_configured: bool, state: &SharedState) -> AfterTools {
    if !direct_return_configured {
        return AfterTools::Model;
    }
    if state.process(|st| st.has_direct_return) {
        AfterTools::ShortCircuit
    } else {
        AfterTools::Model
    }
}
