//! Request types for inference operations.

use crate::inference::types::message::{Message, Role};

/// Request for a chat completion.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The model to use for completion
    pub model: String,
    /// The conversation history
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Sequences at which generation stops
    pub stop: Vec<String>,
}

impl ChatRequest {
    /// Creates a new chat request with a single user message
    #[must_use]
    pub fn with_message(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(content)],
            temperature: 0.0,
            stop: Vec::new(),
        }
    }

    /// Adds a message to the conversation
    #[must_use]
    pub fn add_message(mut self, role: Role, content: impl Into<String>) -> Self {
        self.messages.push(Message {
            role,
            content: content.into(),
        });
        self
    }

    /// Sets the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the stop sequences
    #[must_use]
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }
}
