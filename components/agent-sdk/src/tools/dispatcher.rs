//! Routes parsed actions to registered tools.
//!
//! Every outcome is turned into an [`Observation`]: unknown tool names,
//! tool errors and even panics inside a tool become failure text for the
//! model instead of ending the session.

use crate::tools::ToolRegistry;
use crate::types::{Action, Observation};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

/// Resolves actions against a registry and invokes the tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolDispatcher<'a> {
    registry: &'a ToolRegistry,
}

impl<'a> ToolDispatcher<'a> {
    /// Creates a dispatcher over `registry`.
    #[must_use]
    pub fn new(registry: &'a ToolRegistry) -> Self {
        Self { registry }
    }

    /// Dispatches one action. Never fails.
    #[must_use]
    pub fn dispatch(&self, action: &Action) -> Observation {
        let tool = match self.registry.lookup(&action.tool_name) {
            Ok(tool) => tool,
            Err(e) => {
                warn!(tool = %action.tool_name, "Model requested an unknown tool");
                return Observation::Failure(e.to_string());
            }
        };

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| tool.invoke(&action.input)));
        let elapsed_ms = start.elapsed().as_millis();

        match outcome {
            Ok(Ok(output)) => {
                debug!(tool = %action.tool_name, elapsed_ms, "Tool succeeded");
                Observation::Success(output)
            }
            Ok(Err(e)) => {
                warn!(tool = %action.tool_name, elapsed_ms, error = %e, "Tool failed");
                Observation::Failure(format!("Error: {e}"))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(tool = %action.tool_name, elapsed_ms, panic = %message, "Tool panicked");
                Observation::Failure(format!(
                    "Error: tool '{}' crashed: {message}",
                    action.tool_name
                ))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
