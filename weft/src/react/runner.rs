//! Loop runner: drives the state machine from input messages to the final
//! answer, a short-circuit result, or a fatal error.
//!
//! Built from a [`ReactConfig`]; setup derives the static tool catalog once
//! (failure is fatal before the run starts). Supports `invoke`
//! (non-streaming), `run_with_events` (callback per [`LoopEvent`]), and
//! `stream` (spawned run emitting events over a channel).

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::{LoopState, SharedState};
use crate::stream::{scan_model_stream_with, MessageChunk};

use super::{
    route_after_tools, AfterModel, AfterTools, ModelStep, ReactConfig, ToolStep,
};

/// Final result of one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The run's final message: the terminating assistant message, or the
    /// direct-return tool result. `None` only when a short-circuit found no
    /// matching result: an explicit absence, not an error.
    pub message: Option<Message>,
    /// The run's final state (full history, leftover budget, markers).
    pub state: LoopState,
}

impl RunOutcome {
    /// Text of the final message, if one was produced.
    pub fn final_text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.content.as_str())
    }
}

/// Incremental events of one run, for callers driving live UX.
#[derive(Debug, Clone)]
pub enum LoopEvent {
    /// A model invocation is starting; `remaining` is the budget before it.
    ModelStart { remaining: u32 },
    /// One increment of the model's reply stream.
    ModelChunk(MessageChunk),
    /// The assembled assistant message of a finished model step.
    AssistantMessage(Message),
    /// One tool-result message from the tool step.
    ToolResult(Message),
    /// The direct-return call whose result will end the run.
    DirectReturn { call_id: String },
    /// Terminal event of [`ReactRunner::stream`]: the run's outcome.
    Finished(RunOutcome),
    /// Terminal event of [`ReactRunner::stream`]: the run failed.
    Failed(String),
}

/// Selects the tool result answering `call_id`, discarding the rest.
///
/// `None` when no result matches (or no call id was recorded): the
/// short-circuit produced no value; callers branch on absence rather than
/// treat it as a failure.
pub fn short_circuit_filter(results: Vec<Message>, call_id: Option<&str>) -> Option<Message> {
    let id = call_id?;
    results
        .into_iter()
        .find(|m| m.tool_call_id.as_deref() == Some(id))
}

/// The loop controller.
///
/// Cheap to clone; clones share the collaborators and catalog but each run
/// owns its own [`LoopState`].
///
/// # Example
///
/// ```ignore
/// let runner = ReactRunner::new(config).await?;
/// let outcome = runner.invoke(vec![Message::user("What time is it?")]).await?;
/// println!("{:?}", outcome.final_text());
/// ```
#[derive(Clone)]
pub struct ReactRunner {
    model_step: ModelStep,
    tool_step: ToolStep,
    agent_name: String,
    max_iterations: u32,
}

impl std::fmt::Debug for ReactRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactRunner")
            .field("agent_name", &self.agent_name)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl ReactRunner {
    /// Builds the runner: derives the tool catalog once and wires the steps.
    ///
    /// # Errors
    ///
    /// `ToolCatalog` when listing tools fails, fatal before any run starts.
    pub async fn new(config: ReactConfig) -> Result<Self, AgentError> {
        let catalog = config
            .tools
            .list_tools()
            .await
            .map_err(AgentError::ToolCatalog)?;
        let max_iterations = config.effective_max_iterations();

        let model_step = ModelStep::new(
            config.llm,
            catalog,
            config.before_model,
            config.after_model,
        );
        let tool_step = ToolStep::new(config.tools, config.return_directly);

        Ok(Self {
            model_step,
            tool_step,
            agent_name: config.agent_name,
            max_iterations,
        })
    }

    /// Runs the loop to completion without event reporting.
    pub async fn invoke(&self, input: Vec<Message>) -> Result<RunOutcome, AgentError> {
        self.run_inner(input, &mut |_| {}).await
    }

    /// Runs the loop, invoking `on_event` for each [`LoopEvent`].
    pub async fn run_with_events<F>(
        &self,
        input: Vec<Message>,
        on_event: Option<F>,
    ) -> Result<RunOutcome, AgentError>
    where
        F: FnMut(LoopEvent) + Send,
    {
        match on_event {
            Some(mut f) => self.run_inner(input, &mut f).await,
            None => self.run_inner(input, &mut |_| {}).await,
        }
    }

    /// Spawns the run and returns its event stream.
    ///
    /// The stream ends with [`LoopEvent::Finished`] on success or
    /// [`LoopEvent::Failed`] on a fatal error.
    pub fn stream(&self, input: Vec<Message>) -> UnboundedReceiverStream<LoopEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = self.clone();
        tokio::spawn(async move {
            let events = tx.clone();
            let result = runner
                .run_inner(input, &mut move |ev| {
                    let _ = events.send(ev);
                })
                .await;
            let _ = match result {
                Ok(outcome) => tx.send(LoopEvent::Finished(outcome)),
                Err(e) => tx.send(LoopEvent::Failed(e.to_string())),
            };
        });
        UnboundedReceiverStream::new(rx)
    }

    /// The loop proper: model step, decision (a), tool step, decision (b),
    /// short-circuit exit.
    async fn run_inner(
        &self,
        input: Vec<Message>,
        on_event: &mut (dyn FnMut(LoopEvent) + Send),
    ) -> Result<RunOutcome, AgentError> {
        let state = SharedState::new(LoopState::new(&self.agent_name, self.max_iterations));
        let mut input = input;

        loop {
            on_event(LoopEvent::ModelStart {
                remaining: state.process(|st| st.remaining_iterations),
            });

            let mut reply_stream = self.model_step.run(&state, input).await?;
            let scanned = scan_model_stream_with(&mut reply_stream, |chunk| {
                on_event(LoopEvent::ModelChunk(chunk.clone()));
            })
            .await;
            let (route, reply) = scanned?;
            self.model_step.finish(&state, reply.clone())?;
            on_event(LoopEvent::AssistantMessage(reply.clone()));
            debug!(agent = %self.agent_name, route = route.as_str(), "after model");

            match route {
                AfterModel::End => {
                    return Ok(RunOutcome {
                        message: Some(reply),
                        state: state.into_inner(),
                    });
                }
                AfterModel::Tools => {
                    let results = self.tool_step.run(&state).await?;
                    for result in &results {
                        on_event(LoopEvent::ToolResult(result.clone()));
                    }

                    match route_after_tools(self.tool_step.direct_return_configured(), &state) {
                        AfterTools::Model => {
                            input = results;
                        }
                        AfterTools::ShortCircuit => {
                            let call_id = state.process(|st| st.direct_return_call_id.clone());
                            if let Some(id) = &call_id {
                                on_event(LoopEvent::DirectReturn {
                                    call_id: id.clone(),
                                });
                            }
                            let message = short_circuit_filter(results, call_id.as_deref());
                            return Ok(RunOutcome {
                                message,
                                state: state.into_inner(),
                            });
                        }
                    }
                }
            }
        }
    }
}
