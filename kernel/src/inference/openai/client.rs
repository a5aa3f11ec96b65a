//! `OpenAI` API HTTP client implementation.

use crate::inference::openai::mapping::{
    OpenAIChatRequest, OpenAIChatResponse, create_request, map_response,
};
use crate::inference::provider::LLMProvider;
use crate::inference::retry::RetryConfig;
use crate::inference::types::{ChatRequest, ChatResponse, InferenceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};

/// Configuration for the `OpenAI` provider
pub struct OpenAIConfig {
    /// The API key for authenticating with `OpenAI`
    pub api_key: SecretString,
    /// The base URL for the `OpenAI` API
    pub base_url: Url,
    /// Retry policy for rate limits and transient errors
    pub retry: RetryConfig,
}

impl OpenAIConfig {
    /// Creates a new config with default retry settings
    #[must_use]
    pub fn new(api_key: SecretString, base_url: Url) -> Self {
        Self {
            api_key,
            base_url,
            retry: RetryConfig::default(),
        }
    }

    /// Sets the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Provider implementation for `OpenAI`-compatible APIs.
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Creates a new `OpenAI` provider with the given configuration.
    #[must_use]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn make_request(
        &self,
        url: Url,
        provider_req: &OpenAIChatRequest,
    ) -> Result<ChatResponse, InferenceError> {
        let res = self
            .client
            .post(url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.expose_secret()),
            )
            .json(provider_req)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        match res.status() {
            StatusCode::OK => {
                let body: OpenAIChatResponse = res
                    .json()
                    .await
                    .map_err(|e| InferenceError::ParseError(e.to_string()))?;
                map_response(body).map_err(InferenceError::ApiError)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(InferenceError::RateLimited { retry_after: None }),
            StatusCode::UNAUTHORIZED => Err(InferenceError::Config("API key rejected".to_string())),
            StatusCode::NOT_FOUND => Err(InferenceError::InvalidModel {
                model: provider_req.model.clone(),
            }),
            StatusCode::BAD_REQUEST => {
                let text = res.text().await.unwrap_or_default();
                if text.contains("context_length_exceeded") {
                    Err(InferenceError::ContextLengthExceeded)
                } else {
                    Err(InferenceError::ApiError(format!("Bad Request: {text}")))
                }
            }
            status => {
                let text = res.text().await.unwrap_or_default();
                Err(InferenceError::ApiError(format!("HTTP {status}: {text}")))
            }
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InferenceError> {
        let url = self
            .config
            .base_url
            .join("chat/completions")
            .map_err(|e| InferenceError::Config(format!("Invalid URL join: {e}")))?;
        let provider_req = create_request(request);

        self.config
            .retry
            .run("openai", || self.make_request(url.clone(), &provider_req))
            .await
    }
}
