//! Error types for the agent SDK.
//!
//! Only [`AgentError`] ever escapes a question run. Parse and tool failures are
//! absorbed by the engine and turned into observations for the model.

use thiserror::Error;

/// Top-level error type for a question run.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The model call failed. Fatal to the current question.
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),

    /// Error raised while building the tool set.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error related to the question or configuration.
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// The iteration budget ran out before a final answer.
    #[error("Could not reach a final answer within {max} iterations")]
    MaxIterationsExceeded {
        /// The maximum number of iterations allowed.
        max: u32,
    },

    /// The model kept producing output that did not follow the response format.
    #[error("Model output was malformed {max} times in a row (last: {last})")]
    ParseRetriesExceeded {
        /// The number of consecutive malformed outputs tolerated.
        max: u32,
        /// The last parse failure.
        last: ParseError,
    },

    /// The question ran longer than the configured timeout.
    #[error("Question timed out after {elapsed:?}")]
    Timeout {
        /// How long the loop ran before timing out.
        elapsed: std::time::Duration,
    },

    /// The run was cancelled from outside.
    #[error("Question was cancelled")]
    Cancelled,
}

impl AgentError {
    /// Returns `true` if the loop stopped because a budget ran out.
    #[must_use]
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(
            self,
            Self::MaxIterationsExceeded { .. } | Self::ParseRetriesExceeded { .. }
        )
    }
}

/// Errors related to model inference.
#[derive(Error, Debug, Clone)]
pub enum InferenceError {
    /// The inference API returned an error.
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid model name or model not available.
    #[error("Invalid model: {model}")]
    InvalidModel {
        /// The name of the invalid model.
        model: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Retry after: {retry_after:?}")]
    RateLimited {
        /// How long to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The prompt is longer than the model accepts.
    #[error("Context length exceeded")]
    ContextLengthExceeded,

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(String),

    /// Response parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Missing or invalid provider configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InferenceError {
    /// Returns `true` if this error is transient and a retry may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) => true,
            Self::ApiError(msg) => msg.contains("HTTP 50") || msg.contains("HTTP 52"),
            Self::InvalidModel { .. }
            | Self::ContextLengthExceeded
            | Self::ParseError(_)
            | Self::Config(_) => false,
        }
    }
}

/// Errors related to tool registration and execution.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("'{name}' is not a valid tool, try one of [{}]", available.join(", "))]
    NotFound {
        /// Name of the tool that was not found.
        name: String,
        /// Names that are registered.
        available: Vec<String>,
    },

    /// A tool with the same name is already registered.
    #[error("Tool '{name}' is already registered")]
    Duplicate {
        /// Name of the duplicated tool.
        name: String,
    },

    /// Invalid input provided to tool.
    #[error("Invalid input for tool '{tool}': {reason}")]
    InvalidArguments {
        /// Name of the tool.
        tool: String,
        /// Reason why the input is invalid.
        reason: String,
    },

    /// The tool lacks credentials or configuration it needs.
    #[error("Tool '{tool}' is not configured: {reason}")]
    Misconfigured {
        /// Name of the tool.
        tool: String,
        /// What is missing or wrong.
        reason: String,
    },

    /// Tool execution failed.
    #[error("Tool '{tool}' execution failed: {source}")]
    ExecutionFailed {
        /// Name of the tool that failed.
        tool: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ToolError {
    /// Wraps any error as an execution failure of `tool`.
    pub fn execution(
        tool: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            source: source.into(),
        }
    }

    /// Builds an invalid-input error for `tool`.
    pub fn invalid(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

/// Model output that does not follow the response grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Neither a final answer nor an action was found.
    #[error("missing 'Action:' or 'Final Answer:' marker")]
    MissingMarkers,

    /// An action name was given without an input.
    #[error("missing 'Action Input:' after 'Action: {tool}'")]
    MissingActionInput {
        /// The tool name the model asked for.
        tool: String,
    },

    /// The `Action:` marker was followed by nothing.
    #[error("'Action:' is empty")]
    EmptyAction,

    /// The `Final Answer:` marker was followed by nothing.
    #[error("'Final Answer:' is empty")]
    EmptyAnswer,
}

/// Errors related to the question and configuration.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Question is empty or invalid.
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    /// Missing required configuration.
    #[error("Missing configuration: {key}")]
    MissingConfiguration {
        /// The configuration key that is missing.
        key: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration for '{key}': {value}")]
    InvalidConfiguration {
        /// The configuration key.
        key: String,
        /// The invalid value.
        value: String,
    },

    /// A step was appended after the final step.
    #[error("Transcript is closed: a final answer was already recorded")]
    TranscriptClosed,
}
