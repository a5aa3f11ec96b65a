//! Type definitions for inference operations.
//!
//! This module contains shared types used across all LLM providers. Errors
//! are the SDK's [`InferenceError`] so that provider failures reach the
//! orchestration loop unchanged.

pub mod message;
pub mod request;
pub mod response;

pub use mentor_sdk::InferenceError;
pub use message::{Message, Role};
pub use request::ChatRequest;
pub use response::{ChatResponse, Usage};
