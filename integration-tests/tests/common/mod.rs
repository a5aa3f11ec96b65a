//! Shared test utilities for end-to-end tests.
//!
//! Provides a sandboxed tool set backed by a temporary directory and a mock
//! HTTP server, plus a scripted model that replays canned completions.

#![allow(dead_code)]

use anyhow::Result;
use mentor_kernel::mentor::Mentor;
use mentor_sdk::{AgentConfig, InferenceError, Model, ToolRegistry};
use parking_lot::Mutex;
use secrecy::SecretString;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use study_tools::{
    CalendarConfig, CalendarTool, FlashcardTool, SearchConfig, SearchTool, study_registry,
};
use tempfile::TempDir;
use tokio::runtime::Handle;
use wiremock::MockServer;

/// Path the search mock answers on.
pub const SEARCH_PATH: &str = "/customsearch/v1";

/// Model that returns queued completions and records every prompt.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, InferenceError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// Creates a model replaying `replies` in order.
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Queues a provider failure.
    pub fn push_error(&self, error: InferenceError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// The most recent prompt.
    pub fn last_prompt(&self) -> String {
        self.prompts.lock().last().cloned().unwrap_or_default()
    }
}

impl Model for ScriptedModel {
    fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::ApiError("script exhausted".to_string())))
    }
}

/// Sandbox holding tool state for one test.
pub struct StudyTestContext {
    /// Temporary directory for the token and flashcard files
    pub temp_dir: TempDir,
    /// Mock server standing in for the search and calendar APIs
    pub server: MockServer,
    /// Agent configuration
    pub config: AgentConfig,
}

impl StudyTestContext {
    /// Creates a new context with a five-iteration budget.
    pub async fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            server: MockServer::start().await,
            config: AgentConfig::builder().max_iterations(5).build()?,
        })
    }

    /// Path of the flashcard deck.
    pub fn flashcards_path(&self) -> PathBuf {
        self.temp_dir.path().join("flashcards.json")
    }

    /// Path of the calendar token, which tests never create.
    pub fn token_path(&self) -> PathBuf {
        self.temp_dir.path().join("token.json")
    }

    /// Builds the three study tools against the sandbox.
    pub fn registry(&self, with_search_credentials: bool) -> Result<Arc<ToolRegistry>> {
        let runtime = Handle::current();
        let calendar = CalendarTool::new(
            CalendarConfig::with_api_base(self.token_path(), &format!("{}/", self.server.uri()))?,
            runtime.clone(),
        );

        let (api_key, engine_id) = if with_search_credentials {
            (
                Some(SecretString::new("search-key".into())),
                Some("engine-1".to_string()),
            )
        } else {
            (None, None)
        };
        let search = SearchTool::new(
            SearchConfig::with_endpoint(
                api_key,
                engine_id,
                &format!("{}{SEARCH_PATH}", self.server.uri()),
            )?,
            runtime,
        );

        let flashcards = FlashcardTool::new(self.flashcards_path());
        Ok(study_registry(calendar, search, flashcards)?)
    }

    /// Builds a mentor over the sandboxed tools and `model`.
    pub fn mentor(&self, model: Arc<ScriptedModel>) -> Result<Mentor> {
        self.mentor_with(model, true)
    }

    /// Builds a mentor, optionally leaving the search tool unconfigured.
    pub fn mentor_with(
        &self,
        model: Arc<ScriptedModel>,
        with_search_credentials: bool,
    ) -> Result<Mentor> {
        Ok(Mentor::new(
            self.registry(with_search_credentials)?,
            self.config.clone(),
            model,
        )?)
    }
}
