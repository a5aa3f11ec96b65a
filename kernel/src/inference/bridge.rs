//! Adapts an async [`LLMProvider`] to the blocking [`Model`] the loop calls.
//!
//! The loop runs on a blocking worker thread; each completion is driven to
//! the end on the runtime through a held [`Handle`].

use crate::inference::provider::LLMProvider;
use crate::inference::types::{ChatRequest, InferenceError};
use mentor_sdk::{AgentConfig, Model};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// Stops generation before the model invents its own tool results.
pub const STOP_SEQUENCES: &[&str] = &["\nObservation"];

/// A provider bound to a model name, temperature and runtime.
pub struct BlockingModel {
    provider: Arc<dyn LLMProvider>,
    runtime: Handle,
    model: String,
    temperature: f32,
}

impl BlockingModel {
    /// Binds `provider` to the model settings of `config`.
    #[must_use]
    pub fn new(provider: Arc<dyn LLMProvider>, runtime: Handle, config: &AgentConfig) -> Self {
        Self {
            provider,
            runtime,
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

impl Model for BlockingModel {
    fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let request = ChatRequest::with_message(&self.model, prompt)
            .with_temperature(self.temperature)
            .with_stop(STOP_SEQUENCES.iter().copied());

        debug!(model = %self.model, prompt_chars = prompt.len(), "Requesting completion");
        let response = self.runtime.block_on(self.provider.chat(request))?;
        Ok(response.content)
    }
}
