//! Loop state machine and per-run bookkeeping.

use crate::engine::transcript::Transcript;
use crate::error::AgentError;
use crate::types::{Action, Step};
use std::time::{Duration, Instant};

/// State of the orchestration loop.
#[derive(Debug)]
pub enum LoopState {
    /// About to build the prompt and call the model.
    AwaitingModel,
    /// A completion arrived and must be parsed.
    Parsing {
        /// Raw model output.
        completion: String,
    },
    /// An action was parsed and must be dispatched.
    Dispatching {
        /// Reasoning preceding the action.
        thought: String,
        /// The action to run.
        action: Action,
    },
    /// Terminal: the model produced a final answer.
    Done {
        /// The answer for the user.
        answer: String,
    },
    /// Terminal: the run stopped without an answer.
    Aborted {
        /// Why the run stopped.
        error: AgentError,
    },
}

impl LoopState {
    /// Returns `true` for `Done` and `Aborted`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Aborted { .. })
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingModel => "awaiting_model",
            Self::Parsing { .. } => "parsing",
            Self::Dispatching { .. } => "dispatching",
            Self::Done { .. } => "done",
            Self::Aborted { .. } => "aborted",
        }
    }
}

/// Mutable bookkeeping for one run.
pub(crate) struct RunState {
    pub(crate) transcript: Transcript,
    pub(crate) iteration: u32,
    pub(crate) parse_failures: u32,
    started: Instant,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            iteration: 0,
            parse_failures: 0,
            started: Instant::now(),
        }
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn record(&mut self, step: Step) -> Result<(), AgentError> {
        self.transcript.append(step).map_err(AgentError::from)
    }

    pub(crate) fn finish(self, outcome: Result<String, AgentError>) -> RunReport {
        RunReport {
            elapsed: self.started.elapsed(),
            outcome,
            transcript: self.transcript,
            iterations: self.iteration,
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    /// The final answer, or why there is none.
    pub outcome: Result<String, AgentError>,
    /// Every step recorded during the run.
    pub transcript: Transcript,
    /// Number of model calls made.
    pub iterations: u32,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl RunReport {
    /// The final answer, if the run reached one.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    /// Returns `true` if the run ended in `Done`.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Text to show the user: the answer or an explicit abort message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match &self.outcome {
            Ok(answer) => answer.clone(),
            Err(AgentError::Cancelled) => "Đã hủy câu hỏi.".to_string(),
            Err(e) => format!("Xin lỗi, tôi không thể hoàn thành câu hỏi này ({e})."),
        }
    }

    /// Converts into the bare outcome.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run.
    pub fn into_result(self) -> Result<String, AgentError> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!LoopState::AwaitingModel.is_terminal());
        assert!(
            LoopState::Done {
                answer: "x".to_string()
            }
            .is_terminal()
        );
        assert!(
            LoopState::Aborted {
                error: AgentError::Cancelled
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_user_message_never_empty() {
        let report = RunState::new().finish(Err(AgentError::MaxIterationsExceeded { max: 2 }));
        assert!(!report.is_done());
        assert!(report.user_message().contains("2 iterations"));

        let report = RunState::new().finish(Ok("Hà Nội".to_string()));
        assert_eq!(report.answer(), Some("Hà Nội"));
        assert_eq!(report.user_message(), "Hà Nội");
    }
}
