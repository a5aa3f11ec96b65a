//! OpenAI-compatible chat-completions provider.
//!
//! Works with any endpoint that speaks the `chat/completions` protocol.

pub mod client;
pub mod mapping;

pub use client::{OpenAIConfig, OpenAIProvider};
pub use mapping::{OpenAIChatRequest, OpenAIChatResponse, create_request, map_response};
