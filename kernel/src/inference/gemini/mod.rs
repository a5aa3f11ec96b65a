//! Google Gemini provider.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.

pub mod client;
pub mod mapping;

pub use client::{DEFAULT_BASE_URL, GeminiConfig, GeminiProvider};
