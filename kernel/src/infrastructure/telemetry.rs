//! Logging setup: filter, format and destination.

use crate::infrastructure::config::TelemetrySettings;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Builder for setting up logging.
///
/// Output never goes to stdout, which belongs to the conversation.
pub struct TelemetryBuilder {
    service_name: String,
    log_level: String,
    json: bool,
    log_dir: Option<PathBuf>,
}

impl TelemetryBuilder {
    /// Creates a builder logging at `warn` to stderr.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: "warn".to_string(),
            json: false,
            log_dir: None,
        }
    }

    /// Applies the configured level, format and destination.
    #[must_use]
    pub fn with_settings(self, settings: &TelemetrySettings) -> Self {
        let builder = self
            .with_log_level(&settings.log_level)
            .with_json(settings.json);
        match &settings.log_dir {
            Some(dir) => builder.with_log_dir(dir.clone()),
            None => builder,
        }
    }

    /// Sets the default filter directive; `RUST_LOG` overrides it.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Emits JSON lines.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Writes to daily-rotated files in `dir` instead of stderr.
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Installs the global subscriber.
    ///
    /// The returned guard flushes buffered logs when dropped; keep it alive
    /// for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter directive is invalid or a subscriber
    /// is already installed.
    pub fn init(self) -> Result<WorkerGuard> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.log_level)
                .with_context(|| format!("Invalid log level '{}'", self.log_level))?,
        };

        let (writer, guard) = match &self.log_dir {
            Some(dir) => {
                let file_name = format!("{}.log", self.service_name);
                tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file_name))
            }
            None => tracing_appender::non_blocking(std::io::stderr()),
        };

        let fmt_layer = if self.json {
            fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(writer)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(self.log_dir.is_none())
                .with_writer(writer)
                .boxed()
        };

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .context("Failed to init subscriber")?;

        Ok(guard)
    }
}
