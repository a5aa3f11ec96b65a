//! `ReAct` loop implementation.

use crate::config::AgentConfig;
use crate::engine::cancel::CancellationToken;
use crate::engine::state::{LoopState, RunReport, RunState};
use crate::error::{AgentError, TaskError};
use crate::model::Model;
use crate::prompt::PromptBuilder;
use crate::tools::{ActionParser, ToolDispatcher, ToolRegistry};
use crate::types::{Action, ParsedOutput, Question, Step};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

/// Feedback appended when the model ignores the response grammar.
const FORMAT_REMINDER: &str = "please follow the required response pattern: \
    'Action:' followed by 'Action Input:', or 'Final Answer:'";

/// Core engine that answers questions with the tool-use loop.
///
/// The engine itself is immutable; every call to [`run`](Self::run) owns a
/// fresh transcript, so one engine may serve several questions.
pub struct AgentEngine {
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    prompt: PromptBuilder,
    cancellation: CancellationToken,
}

impl std::fmt::Debug for AgentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentEngine")
            .field("tools", &self.tools)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AgentEngine {
    /// Creates a new agent engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(tools: Arc<ToolRegistry>, config: AgentConfig) -> Result<Self, AgentError> {
        config.validate()?;

        Ok(Self {
            tools,
            config,
            prompt: PromptBuilder::new(),
            cancellation: CancellationToken::new(),
        })
    }

    /// Replaces the prompt builder.
    #[must_use]
    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    /// Replaces the cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns a handle that cancels runs of this engine.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Returns the registered tools.
    #[must_use]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Answers `question`, driving the loop until `Done` or `Aborted`.
    ///
    /// Model calls and tool invocations run strictly one after another on
    /// the calling thread.
    pub fn run(&self, question: &Question, model: &dyn Model) -> RunReport {
        let span = info_span!("question", id = %question.id);
        let _entered = span.enter();

        let mut run = RunState::new();
        let mut state = if question.text.trim().is_empty() {
            LoopState::Aborted {
                error: TaskError::InvalidQuestion("question cannot be empty".to_string()).into(),
            }
        } else {
            LoopState::AwaitingModel
        };

        loop {
            if !state.is_terminal() && self.cancellation.is_cancelled() {
                state = LoopState::Aborted {
                    error: AgentError::Cancelled,
                };
            }

            debug!(state = state.name(), iteration = run.iteration, "Loop transition");

            state = match state {
                LoopState::AwaitingModel => self.await_model(question, &mut run, model),
                LoopState::Parsing { completion } => self.parse(&mut run, &completion),
                LoopState::Dispatching { thought, action } => {
                    self.dispatch(&mut run, thought, action)
                }
                LoopState::Done { answer } => {
                    info!(
                        iterations = run.iteration,
                        steps = run.transcript.len(),
                        "Question answered"
                    );
                    return run.finish(Ok(answer));
                }
                LoopState::Aborted { error } => {
                    warn!(
                        iterations = run.iteration,
                        steps = run.transcript.len(),
                        error = %error,
                        "Question aborted"
                    );
                    return run.finish(Err(error));
                }
            };
        }
    }

    fn await_model(&self, question: &Question, run: &mut RunState, model: &dyn Model) -> LoopState {
        let elapsed = run.elapsed();
        if elapsed > self.config.timeout {
            return LoopState::Aborted {
                error: AgentError::Timeout { elapsed },
            };
        }

        if run.iteration >= self.config.max_iterations {
            return LoopState::Aborted {
                error: AgentError::MaxIterationsExceeded {
                    max: self.config.max_iterations,
                },
            };
        }

        run.iteration += 1;

        if self.config.verbose {
            info!(
                "Agent iteration {}/{}",
                run.iteration, self.config.max_iterations
            );
        }

        let prompt = self
            .prompt
            .render(&question.text, &self.tools, &run.transcript);

        match model.complete(&prompt) {
            Ok(completion) => LoopState::Parsing { completion },
            Err(e) => LoopState::Aborted { error: e.into() },
        }
    }

    fn parse(&self, run: &mut RunState, completion: &str) -> LoopState {
        match ActionParser::parse(completion) {
            Ok(ParsedOutput::Final { thought, answer }) => {
                if self.config.verbose {
                    info!(answer = %answer, "Final answer");
                }
                match run.record(Step::final_answer(thought, answer.clone())) {
                    Ok(()) => LoopState::Done { answer },
                    Err(error) => LoopState::Aborted { error },
                }
            }
            Ok(ParsedOutput::Continue { thought, action }) => {
                run.parse_failures = 0;
                LoopState::Dispatching { thought, action }
            }
            Err(e) => {
                run.parse_failures += 1;
                warn!(
                    error = %e,
                    consecutive = run.parse_failures,
                    max = self.config.max_parse_retries,
                    "Model output did not match the response format"
                );

                let raw = completion.trim();
                let raw = raw.strip_prefix("Thought:").unwrap_or(raw).trim();
                let feedback = format!("Invalid format: {e}; {FORMAT_REMINDER}.");
                if let Err(error) = run.record(Step::rejected(raw, feedback)) {
                    return LoopState::Aborted { error };
                }

                if run.parse_failures >= self.config.max_parse_retries {
                    LoopState::Aborted {
                        error: AgentError::ParseRetriesExceeded {
                            max: self.config.max_parse_retries,
                            last: e,
                        },
                    }
                } else {
                    LoopState::AwaitingModel
                }
            }
        }
    }

    fn dispatch(&self, run: &mut RunState, thought: String, action: Action) -> LoopState {
        if self.config.verbose {
            info!(tool = %action.tool_name, input = %action.input, "Dispatching action");
        }

        let observation = ToolDispatcher::new(&self.tools).dispatch(&action);

        if self.config.verbose {
            info!(
                failed = observation.is_failure(),
                observation = %observation,
                "Observation"
            );
        }

        match run.record(Step::action(thought, action, observation)) {
            Ok(()) => LoopState::AwaitingModel,
            Err(error) => LoopState::Aborted { error },
        }
    }
}
