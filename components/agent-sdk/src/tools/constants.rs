//! Tool name constants.
//!
//! The names are part of the prompt contract: the model must echo them
//! exactly in its `Action:` line.

/// Reads upcoming events from the user's calendar.
pub const CALENDAR: &str = "Google_Calendar_Reader";

/// Searches the web for study material.
pub const SEARCH: &str = "Study_Material_Searcher";

/// Adds, lists and reads flashcards.
pub const FLASHCARDS: &str = "Flashcard_Manager";

/// Markers of the response grammar.
pub mod markers {
    /// Precedes the model's reasoning.
    pub const THOUGHT: &str = "Thought:";
    /// Precedes the tool name.
    pub const ACTION: &str = "Action:";
    /// Precedes the tool input.
    pub const ACTION_INPUT: &str = "Action Input:";
    /// Precedes a tool result.
    pub const OBSERVATION: &str = "Observation:";
    /// Precedes the answer for the user.
    pub const FINAL_ANSWER: &str = "Final Answer:";
}
