//! `OpenAI` API type mapping.

use crate::inference::types::{ChatRequest, ChatResponse, Message, Usage};
use serde::{Deserialize, Serialize};

/// `OpenAI` API chat request format
#[derive(Debug, Serialize)]
pub struct OpenAIChatRequest {
    /// The model identifier
    pub model: String,
    /// The conversation messages
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: f32,
    /// Stop sequences
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// `OpenAI` API choice structure
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: Message,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// `OpenAI` API usage information
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    /// Number of tokens in the prompt
    #[serde(rename = "prompt_tokens")]
    pub prompt: u32,
    /// Number of tokens in the completion
    #[serde(rename = "completion_tokens")]
    pub completion: u32,
}

/// `OpenAI` API chat response format
#[derive(Debug, Deserialize)]
pub struct OpenAIChatResponse {
    /// The generated completion choices
    pub choices: Vec<OpenAIChoice>,
    /// Token usage information if available
    pub usage: Option<OpenAIUsage>,
}

/// Maps `OpenAI` API response to internal `ChatResponse`
///
/// # Errors
///
/// Returns an error if no choices are returned in the response.
pub fn map_response(body: OpenAIChatResponse) -> Result<ChatResponse, String> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| "No choices returned".to_string())?;

    let mut response = ChatResponse::new(choice.message.content);
    if let Some(usage) = body.usage {
        response = response.with_usage(Usage::new(usage.prompt, usage.completion));
    }
    if let Some(reason) = choice.finish_reason {
        response = response.with_finish_reason(reason);
    }
    Ok(response)
}

/// Creates an `OpenAI` API request from internal types
#[must_use]
pub fn create_request(request: ChatRequest) -> OpenAIChatRequest {
    OpenAIChatRequest {
        model: request.model,
        messages: request.messages,
        temperature: request.temperature,
        stop: request.stop,
    }
}
