//! Model step: budget check, input append, hooks, model invocation.
//!
//! One model step decrements the iteration budget (failing with
//! `ExceedMaxIterations` at zero), appends the newly available input
//! messages, runs before-model hooks, and invokes the model with the full
//! history plus the static tool catalog. Once the reply is assembled, the
//! caller appends it and runs after-model hooks via
//! [`finish`](ModelStep::finish).

use std::sync::Arc;

use tracing::debug;

use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::SharedState;
use crate::stream::MessageStream;
use crate::tool_source::ToolSpec;

use super::config::ModelHook;

/// Model step of the loop.
///
/// Holds the model collaborator, the tool catalog derived once at runner
/// setup, and the ordered hook lists.
#[derive(Clone)]
pub struct ModelStep {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
    before_model: Vec<ModelHook>,
    after_model: Vec<ModelHook>,
}

impl ModelStep {
    /// Creates a model step with the given collaborator, catalog, and hooks.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Vec<ToolSpec>,
        before_model: Vec<ModelHook>,
        after_model: Vec<ModelHook>,
    ) -> Self {
        Self {
            llm,
            tools,
            before_model,
            after_model,
        }
    }

    /// Runs the pre-invocation half of the step and starts the model stream.
    ///
    /// Budget check, decrement, input append and before-model hooks happen in
    /// one state closure, so the model always sees a consistent history.
    ///
    /// # Errors
    ///
    /// `ExceedMaxIterations` when the budget is already zero; any error a
    /// before-model hook returns; model invocation failures.
    pub async fn run(
        &self,
        state: &SharedState,
        input: Vec<Message>,
    ) -> Result<MessageStream, AgentError> {
        let history = state.process(|st| -> Result<Vec<Message>, AgentError> {
            if st.remaining_iterations == 0 {
                return Err(AgentError::ExceedMaxIterations);
            }
            st.remaining_iterations -= 1;
            st.messages.extend(input);
            for hook in &self.before_model {
                hook(&mut st.messages)?;
            }
            debug!(
                agent = %st.agent_name,
                remaining = st.remaining_iterations,
                history = st.messages.len(),
                "invoking model"
            );
            Ok(st.messages.clone())
        })?;

        self.llm.invoke_stream(&history, &self.tools).await
    }

    /// Appends the assembled reply to history and runs after-model hooks.
    ///
    /// # Errors
    ///
    /// Any error an after-model hook returns.
    pub fn finish(&self, state: &SharedState, reply: Message) -> Result<(), AgentError> {
        state.process(|st| -> Result<(), AgentError> {
            st.messages.push(reply);
            for hook in &self.after_model {
                hook(&mut st.messages)?;
            }
            Ok(())
        })
    }
}
