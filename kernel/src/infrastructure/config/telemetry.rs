//! Logging configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON lines instead of text.
    #[serde(default)]
    pub json: bool,
    /// Directory for daily-rotated log files. Logs go to stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            log_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
