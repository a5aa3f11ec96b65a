//! Engine builder pattern.

use crate::config::AgentConfig;
use crate::engine::{AgentEngine, CancellationToken};
use crate::error::{AgentError, TaskError};
use crate::prompt::PromptBuilder;
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Builder for constructing agent engines.
#[derive(Debug, Default)]
pub struct AgentEngineBuilder {
    tools: Option<Arc<ToolRegistry>>,
    config: Option<AgentConfig>,
    prompt: Option<PromptBuilder>,
    cancellation: Option<CancellationToken>,
}

impl AgentEngineBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tool registry.
    #[must_use]
    pub fn tools(mut self, tools: impl Into<Arc<ToolRegistry>>) -> Self {
        self.tools = Some(tools.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the prompt builder.
    #[must_use]
    pub fn prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Sets the token used to cancel the run.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Builds the agent engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool registry is not set or the configuration
    /// is invalid.
    pub fn build(self) -> Result<AgentEngine, AgentError> {
        let tools = self.tools.ok_or_else(|| TaskError::MissingConfiguration {
            key: "tools".to_string(),
        })?;

        let engine = AgentEngine::new(tools, self.config.unwrap_or_default())?
            .with_prompt(self.prompt.unwrap_or_default());

        Ok(match self.cancellation {
            Some(token) => engine.with_cancellation(token),
            None => engine,
        })
    }
}
