//! Configuration management for the mentor.
//!
//! Settings come from defaults, then a `.env` file, then `MENTOR__*`
//! environment variables (`__` separates sections), for example
//! `MENTOR__AGENT__MAX_ITERATIONS=10` or `MENTOR__INFERENCE__PROVIDER=openai`.
//! The bare variable names `GOOGLE_API_KEY`, `CUSTOM_SEARCH_API_KEY` and
//! `SEARCH_ENGINE_ID` fill in keys that are still unset.
//!
//! # Example
//!
//! ```no_run
//! use mentor_kernel::infrastructure::config::Settings;
//!
//! let settings = Settings::new()?;
//! # Ok::<(), config::ConfigError>(())
//! ```

pub mod inference;
pub mod telemetry;
pub mod tools;

pub use inference::{InferenceSettings, ProviderKind};
pub use telemetry::TelemetrySettings;
pub use tools::ToolSettings;

use config::{Config, ConfigError, Environment, Map};
use mentor_sdk::AgentConfig;
use secrecy::SecretString;
use serde::Deserialize;

/// Top-level configuration for the mentor.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Inference provider settings.
    #[serde(default)]
    pub inference: InferenceSettings,
    /// Tool settings.
    #[serde(default)]
    pub tools: ToolSettings,
    /// Logging settings.
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    /// Orchestration loop settings.
    #[serde(default)]
    pub agent: AgentConfig,
}

impl Settings {
    /// Loads settings from `.env`, the process environment and defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built, deserialized
    /// or validated.
    pub fn new() -> Result<Self, ConfigError> {
        // A missing .env file is normal.
        let _ = dotenvy::dotenv();
        Self::load(None, |key| std::env::var(key).ok())
    }

    /// Loads settings from an explicit variable map instead of the process
    /// environment. `legacy` resolves the bare fallback variable names.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be built, deserialized
    /// or validated.
    pub fn load(
        env: Option<Map<String, String>>,
        legacy: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(
                Environment::with_prefix("MENTOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let mut settings: Self = s.try_deserialize()?;
        settings.apply_legacy(legacy);
        settings
            .agent
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(settings)
    }

    fn apply_legacy(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let secret = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(SecretString::from);

        if self.inference.api_key.is_none() && self.inference.provider == ProviderKind::Gemini {
            self.inference.api_key = secret("GOOGLE_API_KEY");
        }
        if self.tools.search_api_key.is_none() {
            self.tools.search_api_key = secret("CUSTOM_SEARCH_API_KEY");
        }
        if self.tools.search_engine_id.is_none() {
            self.tools.search_engine_id = lookup("SEARCH_ENGINE_ID").filter(|v| !v.is_empty());
        }
    }
}
