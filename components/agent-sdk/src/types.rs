//! Core types for the orchestration loop.

use serde::{Deserialize, Serialize};

/// A tool call requested by the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// Raw input for the tool, taken verbatim from the model output.
    pub input: String,
}

impl Action {
    /// Creates a new action.
    pub fn new(tool_name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            input: input.into(),
        }
    }
}

/// What the model asked for in one completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedOutput {
    /// The model wants a tool to be called.
    Continue {
        /// Reasoning that preceded the action.
        thought: String,
        /// The requested action.
        action: Action,
    },
    /// The model is done.
    Final {
        /// Reasoning that preceded the answer.
        thought: String,
        /// The answer for the user.
        answer: String,
    },
}

/// Result of dispatching an action, as shown to the model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Observation {
    /// The tool produced a result.
    Success(String),
    /// The action could not be carried out.
    Failure(String),
}

impl Observation {
    /// Returns the text fed back to the model.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    /// Returns `true` for failure observations.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// One iteration of the loop. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    thought: String,
    action: Option<Action>,
    observation: Option<Observation>,
    answer: Option<String>,
    is_final: bool,
}

impl Step {
    /// A step that dispatched an action and observed its result.
    #[must_use]
    pub fn action(thought: impl Into<String>, action: Action, observation: Observation) -> Self {
        Self {
            thought: thought.into(),
            action: Some(action),
            observation: Some(observation),
            answer: None,
            is_final: false,
        }
    }

    /// A step whose model output was rejected, with corrective feedback.
    #[must_use]
    pub fn rejected(raw_output: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            thought: raw_output.into(),
            action: None,
            observation: Some(Observation::Failure(feedback.into())),
            answer: None,
            is_final: false,
        }
    }

    /// The terminal step carrying the final answer.
    #[must_use]
    pub fn final_answer(thought: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            thought: thought.into(),
            action: None,
            observation: None,
            answer: Some(answer.into()),
            is_final: true,
        }
    }

    /// Reasoning recorded for this step.
    #[must_use]
    pub fn thought(&self) -> &str {
        &self.thought
    }

    /// The dispatched action, if any.
    #[must_use]
    pub fn action_taken(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// The observation fed back to the model, if any.
    #[must_use]
    pub fn observation(&self) -> Option<&Observation> {
        self.observation.as_ref()
    }

    /// The final answer, present only on the final step.
    #[must_use]
    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    /// Whether this step ended the run.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.is_final
    }
}

/// A user question handed to the engine.
#[derive(Clone, Debug, Default)]
pub struct Question {
    /// Identifier used in logs.
    pub id: String,
    /// The free-text question.
    pub text: String,
}

impl Question {
    /// Creates a new question.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}
