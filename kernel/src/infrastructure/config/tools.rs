//! Tool configuration: credentials and file locations.

use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

/// Settings for the calendar, search and flashcard tools.
#[derive(Debug, Deserialize, Clone)]
pub struct ToolSettings {
    /// Authorized-user token file for the calendar.
    #[serde(default = "default_token_path")]
    pub calendar_token_path: PathBuf,
    /// Override for the Calendar API base URL.
    pub calendar_api_base: Option<String>,
    /// Custom Search API key.
    pub search_api_key: Option<SecretString>,
    /// Programmable search engine id.
    pub search_engine_id: Option<String>,
    /// Override for the Custom Search endpoint.
    pub search_endpoint: Option<String>,
    /// Flashcard deck file.
    #[serde(default = "default_flashcards_path")]
    pub flashcards_path: PathBuf,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            calendar_token_path: default_token_path(),
            calendar_api_base: None,
            search_api_key: None,
            search_engine_id: None,
            search_endpoint: None,
            flashcards_path: default_flashcards_path(),
        }
    }
}

fn default_token_path() -> PathBuf {
    PathBuf::from("token.json")
}

fn default_flashcards_path() -> PathBuf {
    PathBuf::from("flashcards.json")
}
