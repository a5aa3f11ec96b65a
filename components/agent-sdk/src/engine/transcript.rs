//! The ordered step history of one question.

use crate::error::TaskError;
use crate::tools::constants::markers;
use crate::types::Step;
use std::fmt::Write;

/// Steps recorded while answering one question.
///
/// Owned by a single run and dropped with it. Nothing may be appended after
/// a final step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    steps: Vec<Step>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TranscriptClosed`] if a final step was already
    /// recorded.
    pub fn append(&mut self, step: Step) -> Result<(), TaskError> {
        if self.is_closed() {
            return Err(TaskError::TranscriptClosed);
        }
        self.steps.push(step);
        Ok(())
    }

    /// Returns `true` once a final step has been recorded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.steps.last().is_some_and(Step::is_final)
    }

    /// Recorded steps, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Renders the scratchpad injected into the next prompt.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            if !step.thought().is_empty() {
                let _ = writeln!(out, "{} {}", markers::THOUGHT, step.thought());
            }
            if let Some(action) = step.action_taken() {
                let _ = writeln!(out, "{} {}", markers::ACTION, action.tool_name);
                let _ = writeln!(out, "{} {}", markers::ACTION_INPUT, action.input);
            }
            if let Some(observation) = step.observation() {
                let _ = writeln!(out, "{} {}", markers::OBSERVATION, observation.text().trim_end());
            }
            if let Some(answer) = step.answer() {
                let _ = writeln!(out, "{} {answer}", markers::FINAL_ANSWER);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, Observation};

    #[test]
    fn test_render_is_chronological() {
        let mut transcript = Transcript::new();
        transcript
            .append(Step::action(
                "Cần xem lịch",
                Action::new("Google_Calendar_Reader", "3"),
                Observation::Success("Không tìm thấy sự kiện nào.\n".to_string()),
            ))
            .unwrap();
        transcript
            .append(Step::rejected("lan man", "Invalid format"))
            .unwrap();

        assert_eq!(
            transcript.render(),
            "Thought: Cần xem lịch\n\
             Action: Google_Calendar_Reader\n\
             Action Input: 3\n\
             Observation: Không tìm thấy sự kiện nào.\n\
             Thought: lan man\n\
             Observation: Invalid format\n"
        );
        assert_eq!(transcript.render(), transcript.render());
    }

    #[test]
    fn test_no_step_after_final() {
        let mut transcript = Transcript::new();
        transcript.append(Step::final_answer("", "Hà Nội")).unwrap();

        assert!(transcript.is_closed());
        assert!(matches!(
            transcript.append(Step::rejected("again", "x")),
            Err(TaskError::TranscriptClosed)
        ));
        assert_eq!(transcript.len(), 1);
    }
}
