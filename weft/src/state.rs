//! Per-run loop state and its funneled accessor.
//!
//! One [`LoopState`] exists per run and is owned by that run's loop. Every
//! read and write goes through [`SharedState::process`], a read-modify-write
//! closure over the mutex-guarded state, so no step observes a torn
//! intermediate. The pending-action map is the out-of-band side channel
//! between tool execution and asynchronous consumers; entries are removed
//! once consumed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Message, Role};

/// An in-flight action deposited by a tool for an out-of-band consumer.
///
/// The payload is opaque to the loop; tools and their consumers agree on its
/// shape. Stored in `LoopState::pending_tool_actions` keyed by tool name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolAction {
    /// Opaque action payload.
    pub payload: Value,
}

impl ToolAction {
    /// Creates an action with the given payload.
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }
}

/// Mutable state threaded through one run of the loop.
///
/// Created once per run, discarded at run end, never shared across runs.
/// Steps and hooks mutate it only through [`SharedState::process`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopState {
    /// Conversation history; append-only during a run.
    pub messages: Vec<Message>,
    /// Model invocations left; decremented once per model step.
    pub remaining_iterations: u32,
    /// Out-of-band actions keyed by tool name; removed once consumed.
    pub pending_tool_actions: HashMap<String, ToolAction>,
    /// Id of the tool call whose result ends the run; set at most once.
    pub direct_return_call_id: Option<String>,
    /// Companion flag, set together with `direct_return_call_id`.
    pub has_direct_return: bool,
    /// Run label; opaque to the control logic, used in log fields.
    pub agent_name: String,
}

impl LoopState {
    /// Creates the state for a fresh run.
    ///
    /// History starts empty; the run's input messages flow in as the first
    /// model step's input. `max_iterations` is the already-normalized bound
    /// (callers apply the default for non-positive configuration).
    pub fn new(agent_name: impl Into<String>, max_iterations: u32) -> Self {
        Self {
            messages: vec![],
            remaining_iterations: max_iterations,
            pending_tool_actions: HashMap::new(),
            direct_return_call_id: None,
            has_direct_return: false,
            agent_name: agent_name.into(),
        }
    }

    /// Returns the content of the chronologically last Assistant message, if any.
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.clone())
    }
}

/// Exclusive-access handle to one run's [`LoopState`].
///
/// All state access is funneled through [`process`](Self::process); the
/// closure runs under the lock, so it must stay short and must not block.
/// Cloning the handle shares the same underlying state.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<LoopState>>,
}

impl SharedState {
    /// Wraps a fresh run state.
    pub fn new(state: LoopState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Runs a read-modify-write closure against the state.
    pub fn process<R>(&self, f: impl FnOnce(&mut LoopState) -> R) -> R {
        let mut guard = self.inner.lock().expect("loop state mutex poisoned");
        f(&mut guard)
    }

    /// Deposits an out-of-band action for `tool_name`, replacing any pending one.
    pub fn send_tool_action(&self, tool_name: impl Into<String>, action: ToolAction) {
        let tool_name = tool_name.into();
        self.process(|st| {
            st.pending_tool_actions.insert(tool_name, action);
        });
    }

    /// Takes and removes the pending action for `tool_name`, if any.
    pub fn pop_tool_action(&self, tool_name: &str) -> Option<ToolAction> {
        self.process(|st| st.pending_tool_actions.remove(tool_name))
    }

    /// Consumes the handle and returns the final state.
    ///
    /// Falls back to cloning when other handles are still alive (e.g. a tool
    /// context kept one).
    pub fn into_inner(self) -> LoopState {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().expect("loop state mutex poisoned"),
            Err(shared) => shared.lock().expect("loop state mutex poisoned").clone(),
        }
    }
}
