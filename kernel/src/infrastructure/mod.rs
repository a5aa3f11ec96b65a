/// Configuration management for the mentor.
pub mod config;
/// Logging setup.
pub mod telemetry;
