//! Gemini API type mapping.

use crate::inference::types::{ChatResponse, Message, Role, Usage};
use serde::{Deserialize, Serialize};

/// A text part of a content block.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// The text
    #[serde(default)]
    pub text: String,
}

/// A content block with its author.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// `user` or `model`; absent for system instructions
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    /// The parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// Sampling parameters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Sequences at which generation stops
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation turns
    pub contents: Vec<GeminiContent>,
    /// System prompt, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    /// Sampling parameters
    pub generation_config: GenerationConfig,
}

/// One generated candidate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content; missing when generation was blocked
    pub content: Option<GeminiContent>,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Token accounting.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    /// Prompt tokens
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Generated tokens
    #[serde(default)]
    pub candidates_token_count: u32,
}

/// `generateContent` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Token accounting
    pub usage_metadata: Option<GeminiUsage>,
}

fn text_content(role: Option<&str>, text: String) -> GeminiContent {
    GeminiContent {
        role: role.map(str::to_string),
        parts: vec![GeminiPart { text }],
    }
}

/// Builds a Gemini request. System messages become the system instruction
/// and assistant turns are sent with the `model` role.
#[must_use]
pub fn create_request(messages: Vec<Message>, temperature: f32, stop: Vec<String>) -> GeminiRequest {
    let mut system = Vec::new();
    let mut contents = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system.push(message.content),
            Role::User => contents.push(text_content(Some("user"), message.content)),
            Role::Assistant => contents.push(text_content(Some("model"), message.content)),
        }
    }

    GeminiRequest {
        contents,
        system_instruction: (!system.is_empty()).then(|| text_content(None, system.join("\n\n"))),
        generation_config: GenerationConfig {
            temperature,
            stop_sequences: stop,
        },
    }
}

/// Maps a Gemini response to the internal `ChatResponse`.
///
/// # Errors
///
/// Returns an error if there is no candidate or the first one has no content.
pub fn map_response(body: GeminiResponse) -> Result<ChatResponse, String> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| "No candidates returned".to_string())?;

    let Some(content) = candidate.content else {
        return Err(format!(
            "Candidate has no content (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ));
    };

    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    let mut response = ChatResponse::new(text);
    if let Some(usage) = body.usage_metadata {
        response = response.with_usage(Usage::new(
            usage.prompt_token_count,
            usage.candidates_token_count,
        ));
    }
    if let Some(reason) = candidate.finish_reason {
        response = response.with_finish_reason(reason);
    }
    Ok(response)
}
