//! Mentor Kernel - runtime around the study mentor loop.
//!
//! This crate wires configuration, logging, inference providers and the
//! study tools into a [`mentor::Mentor`] service, and provides the
//! interactive command line loop.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

/// Interactive question loop.
pub mod cli;
/// LLM inference providers and the blocking model bridge.
pub mod inference;
/// Infrastructure components (config, telemetry).
pub mod infrastructure;
/// The mentor session service.
pub mod mentor;
