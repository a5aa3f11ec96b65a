//! Tool system: the capability trait, the registry, the action parser and
//! the dispatcher.

pub mod constants;
pub mod dispatcher;
pub mod parser;
pub mod payload;
pub mod registry;

use crate::error::ToolError;
use std::borrow::Cow;

/// A named capability the loop can invoke with a text input.
pub trait Tool: Send + Sync {
    /// Returns the unique name of the tool.
    fn name(&self) -> Cow<'static, str>;

    /// Returns the description shown to the model, including the calling
    /// convention.
    fn description(&self) -> Cow<'static, str>;

    /// Invokes the tool with the raw action input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or the tool fails.
    fn invoke(&self, input: &str) -> Result<String, ToolError>;
}

pub use dispatcher::ToolDispatcher;
pub use parser::ActionParser;
pub use payload::{PayloadError, decode_payload, extract_json_object};
pub use registry::ToolRegistry;
