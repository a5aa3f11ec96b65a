//! Configuration for the orchestration loop.
//!
//! Provides a strongly-typed configuration with serde support and
//! sensible defaults. Loading from files or the environment is left to the
//! host application.

use crate::error::TaskError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Agent configuration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum number of model calls for one question.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Consecutive malformed model outputs tolerated. The run aborts on the
    /// output that reaches this count.
    #[serde(default = "default_max_parse_retries")]
    pub max_parse_retries: u32,

    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f32,

    /// Wall-clock limit for one question.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Log every step at info level.
    #[serde(default)]
    pub verbose: bool,
}

impl AgentConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a budget is zero or the model name is empty.
    pub fn validate(&self) -> Result<&Self, TaskError> {
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations", "0"));
        }

        if self.max_parse_retries == 0 {
            return Err(invalid("max_parse_retries", "0"));
        }

        if self.model.trim().is_empty() {
            return Err(invalid("model", "empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature", &self.temperature.to_string()));
        }

        Ok(self)
    }

    /// Returns a builder for creating configuration.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_parse_retries: default_max_parse_retries(),
            model: default_model(),
            temperature: 0.0,
            timeout: default_timeout(),
            verbose: false,
        }
    }
}

/// Builder for constructing [`AgentConfig`].
#[derive(Debug, Default)]
pub struct AgentConfigBuilder {
    max_iterations: Option<u32>,
    max_parse_retries: Option<u32>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
    verbose: Option<bool>,
}

impl AgentConfigBuilder {
    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets how many consecutive malformed outputs are tolerated.
    #[must_use]
    pub fn max_parse_retries(mut self, retries: u32) -> Self {
        self.max_parse_retries = Some(retries);
        self
    }

    /// Sets the model to use.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the per-question timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets whether to log every step.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Builds the configuration, validating all values.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn build(self) -> Result<AgentConfig, TaskError> {
        let defaults = AgentConfig::default();
        let config = AgentConfig {
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            max_parse_retries: self.max_parse_retries.unwrap_or(defaults.max_parse_retries),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            verbose: self.verbose.unwrap_or(defaults.verbose),
        };

        config.validate()?;
        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> TaskError {
    TaskError::InvalidConfiguration {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn default_max_iterations() -> u32 {
    15
}

fn default_max_parse_retries() -> u32 {
    3
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

// Durations are stored as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
