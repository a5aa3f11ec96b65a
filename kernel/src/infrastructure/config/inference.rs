//! Inference provider configuration.

use secrecy::SecretString;
use serde::Deserialize;

/// Which chat backend answers the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini `generateContent`.
    #[default]
    Gemini,
    /// Any `OpenAI`-compatible chat-completions endpoint.
    OpenAI,
}

/// Inference provider settings.
#[derive(Debug, Deserialize, Clone)]
pub struct InferenceSettings {
    /// Backend to use.
    #[serde(default)]
    pub provider: ProviderKind,
    /// API key for the backend.
    pub api_key: Option<SecretString>,
    /// Override for the API base URL.
    pub base_url: Option<String>,
    /// Retries for rate limits and transient failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base delay for exponential backoff, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}
