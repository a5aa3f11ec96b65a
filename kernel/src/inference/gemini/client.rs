//! Gemini HTTP client implementation.

use crate::inference::gemini::mapping::{GeminiRequest, GeminiResponse, create_request, map_response};
use crate::inference::provider::LLMProvider;
use crate::inference::retry::RetryConfig;
use crate::inference::types::{ChatRequest, ChatResponse, InferenceError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;

/// Public Generative Language API base.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Configuration for the Gemini provider
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: SecretString,
    /// API base URL, ending with a slash
    pub base_url: Url,
    /// Retry policy for rate limits and transient errors
    pub retry: RetryConfig,
}

impl GeminiConfig {
    /// Creates a config against `base_url` with default retries
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

/// Provider implementation for Gemini models.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, model: &str) -> Result<Url, InferenceError> {
        self.config
            .base_url
            .join(&format!("models/{model}:generateContent"))
            .map_err(|e| InferenceError::Config(format!("Invalid URL join: {e}")))
    }

    async fn make_request(
        &self,
        url: Url,
        body: &GeminiRequest,
        model: &str,
    ) -> Result<ChatResponse, InferenceError> {
        let res = self
            .client
            .post(url)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        map_api_response(res, model).await
    }
}

fn retry_after(res: &Response) -> Option<Duration> {
    res.headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

async fn map_api_response(res: Response, model: &str) -> Result<ChatResponse, InferenceError> {
    match res.status() {
        StatusCode::OK => {
            let body: GeminiResponse = res
                .json()
                .await
                .map_err(|e| InferenceError::ParseError(e.to_string()))?;
            map_response(body).map_err(InferenceError::ApiError)
        }
        StatusCode::TOO_MANY_REQUESTS => Err(InferenceError::RateLimited {
            retry_after: retry_after(&res),
        }),
        StatusCode::NOT_FOUND => Err(InferenceError::InvalidModel {
            model: model.to_string(),
        }),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let text = res.text().await.unwrap_or_default();
            Err(InferenceError::Config(format!("API key rejected: {text}")))
        }
        StatusCode::BAD_REQUEST => {
            let text = res.text().await.unwrap_or_default();
            if text.contains("exceeds the maximum number of tokens") {
                Err(InferenceError::ContextLengthExceeded)
            } else if text.contains("API_KEY_INVALID") {
                Err(InferenceError::Config(format!("API key rejected: {text}")))
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

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, InferenceError> {
        let url = self.endpoint(&request.model)?;
        let body = create_request(request.messages, request.temperature, request.stop);

        let response = self
            .config
            .retry
            .run("gemini", || self.make_request(url.clone(), &body, &request.model))
            .await?;

        debug!(
            model = %request.model,
            tokens = ?response.total_tokens(),
            finish_reason = ?response.finish_reason,
            "Gemini completion received"
        );
        Ok(response)
    }
}
