//! Loop configuration: collaborators, direct-return set, bound, hooks.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::tool_source::ToolSource;

use super::DEFAULT_MAX_ITERATIONS;

/// A before/after-model hook.
///
/// Receives the current visible message history and may rewrite it in place;
/// returning an error aborts the model step and propagates unmodified. Hooks
/// run in registration order under the state lock, so they must stay short
/// and must not block.
pub type ModelHook = Arc<dyn Fn(&mut Vec<Message>) -> Result<(), AgentError> + Send + Sync>;

/// Configuration for one [`ReactRunner`](super::ReactRunner).
///
/// Built with [`new`](Self::new) plus `with_*` builders. `max_iterations`
/// values of zero or below fall back to [`DEFAULT_MAX_ITERATIONS`].
#[derive(Clone)]
pub struct ReactConfig {
    /// Model invocation collaborator.
    pub llm: Arc<dyn LlmClient>,
    /// Tool invocation collaborator.
    pub tools: Arc<dyn ToolSource>,
    /// Names of tools whose result ends the run directly.
    pub return_directly: HashSet<String>,
    /// Run label, opaque to the control logic.
    pub agent_name: String,
    /// Maximum model invocations per run; ≤0 means use the default.
    pub max_iterations: i32,
    /// Hooks run before each model invocation, in order.
    pub before_model: Vec<ModelHook>,
    /// Hooks run after each model reply is available, in order.
    pub after_model: Vec<ModelHook>,
}

impl ReactConfig {
    /// Creates a config with the two collaborators and defaults elsewhere.
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>) -> Self {
        Self {
            llm,
            tools,
            return_directly: HashSet::new(),
            agent_name: "agent".to_string(),
            max_iterations: 0,
            before_model: vec![],
            after_model: vec![],
        }
    }

    /// Sets the run label (builder).
    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Sets the iteration bound (builder); ≤0 selects the default.
    pub fn with_max_iterations(mut self, max: i32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Marks tools whose result should end the run directly (builder).
    pub fn with_return_directly<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_directly.extend(names.into_iter().map(Into::into));
        self
    }

    /// Appends a before-model hook (builder).
    pub fn with_before_model(
        mut self,
        hook: impl Fn(&mut Vec<Message>) -> Result<(), AgentError> + Send + Sync + 'static,
    ) -> Self {
        self.before_model.push(Arc::new(hook));
        self
    }

    /// Appends an after-model hook (builder).
    pub fn with_after_model(
        mut self,
        hook: impl Fn(&mut Vec<Message>) -> Result<(), AgentError> + Send + Sync + 'static,
    ) -> Self {
        self.after_model.push(Arc::new(hook));
        self
    }

    /// The bound actually applied to a run.
    pub fn effective_max_iterations(&self) -> u32 {
        if self.max_iterations <= 0 {
            DEFAULT_MAX_ITERATIONS
        } else {
            self.max_iterations as u32
        }
    }
}
