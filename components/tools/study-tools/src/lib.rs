//! Study tools - the capabilities the mentor can call.
//!
//! Each tool implements [`mentor_sdk::Tool`] and reports expected problems
//! (nothing found, missing credentials) as readable text rather than
//! panicking. HTTP-backed tools are synchronous from the loop's point of view
//! and drive their requests on a borrowed Tokio runtime handle.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod calendar;
pub mod flashcards;
pub mod search;

pub use calendar::{CalendarConfig, CalendarTool};
pub use flashcards::{Flashcard, FlashcardCommand, FlashcardStore, FlashcardTool};
pub use search::{SearchConfig, SearchTool};

use mentor_sdk::{ToolError, ToolRegistry};
use std::sync::Arc;

/// Builds the registry holding the three study tools.
///
/// # Errors
///
/// Returns an error if two tools share a name.
pub fn study_registry(
    calendar: CalendarTool,
    search: SearchTool,
    flashcards: FlashcardTool,
) -> Result<Arc<ToolRegistry>, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(calendar)?;
    registry.register(search)?;
    registry.register(flashcards)?;
    Ok(Arc::new(registry))
}
