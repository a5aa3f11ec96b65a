//! The model collaborator seen by the engine.

use crate::error::InferenceError;

/// A language model that completes a prompt.
///
/// Calls are blocking from the engine's point of view. Implementations are
/// expected to apply their own retry policy; the engine never retries.
pub trait Model: Send + Sync {
    /// Returns the completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error on network, authentication or provider failure.
    fn complete(&self, prompt: &str) -> Result<String, InferenceError>;
}

impl<F> Model for F
where
    F: Fn(&str) -> Result<String, InferenceError> + Send + Sync,
{
    fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        self(prompt)
    }
}
