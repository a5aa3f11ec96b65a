//! The mentor session service.
//!
//! Owns the shared tool set and model, and runs each question on a blocking
//! worker with its own transcript and cancellation token.

use crate::inference::{
    BlockingModel, GeminiConfig, GeminiProvider, LLMProvider, OpenAIConfig, OpenAIProvider,
    RetryConfig, gemini,
};
use crate::infrastructure::config::{InferenceSettings, ProviderKind, Settings, ToolSettings};
use anyhow::{Context, Result, bail};
use mentor_sdk::{
    AgentConfig, AgentEngineBuilder, AgentError, CancellationToken, Model, Question, RunReport,
    ToolRegistry,
};
use reqwest::Url;
use std::sync::Arc;
use study_tools::{
    CalendarConfig, CalendarTool, FlashcardTool, SearchConfig, SearchTool, study_registry,
};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;
use uuid::Uuid;

const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";

/// Answers questions with the shared tools and model.
pub struct Mentor {
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    model: Arc<dyn Model>,
}

/// A question being answered on a worker thread.
pub struct PendingAnswer {
    id: String,
    cancel: CancellationToken,
    task: JoinHandle<RunReport>,
}

impl PendingAnswer {
    /// Question id, as logged in the `question` span.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Requests cancellation. The in-flight step finishes first.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the run to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker panicked.
    pub async fn wait(self) -> Result<RunReport, JoinError> {
        self.task.await
    }

    /// Mutable access to the worker, for use in `select!`.
    pub fn task_mut(&mut self) -> &mut JoinHandle<RunReport> {
        &mut self.task
    }
}

impl Mentor {
    /// Creates the service.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
        model: Arc<dyn Model>,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            tools,
            config,
            model,
        })
    }

    /// Wires tools, provider and loop settings from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL override is invalid, the provider has no
    /// API key, or the loop settings are invalid.
    pub fn from_settings(settings: &Settings, runtime: &Handle) -> Result<Self> {
        let tools = build_tools(&settings.tools, runtime)?;
        let provider = build_provider(&settings.inference)?;
        let model = BlockingModel::new(provider, runtime.clone(), &settings.agent);

        info!(
            provider = ?settings.inference.provider,
            model = %settings.agent.model,
            tools = ?tools.names(),
            "Mentor initialized"
        );
        Ok(Self::new(tools, settings.agent.clone(), Arc::new(model))?)
    }

    /// Registered tools.
    #[must_use]
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Starts answering `text` on a blocking worker.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be built.
    pub fn ask(&self, text: impl Into<String>) -> Result<PendingAnswer, AgentError> {
        let engine = AgentEngineBuilder::new()
            .tools(Arc::clone(&self.tools))
            .config(self.config.clone())
            .build()?;
        let cancel = engine.cancellation_token();

        let id = Uuid::new_v4().to_string();
        let question = Question::new(id.clone(), text);
        let model = Arc::clone(&self.model);

        let task = tokio::task::spawn_blocking(move || engine.run(&question, model.as_ref()));

        Ok(PendingAnswer { id, cancel, task })
    }
}

fn build_tools(settings: &ToolSettings, runtime: &Handle) -> Result<Arc<ToolRegistry>> {
    let calendar = match &settings.calendar_api_base {
        Some(base) => CalendarConfig::with_api_base(&settings.calendar_token_path, base),
        None => CalendarConfig::new(&settings.calendar_token_path),
    }
    .context("Invalid calendar API base URL")?;

    let search = match &settings.search_endpoint {
        Some(endpoint) => SearchConfig::with_endpoint(
            settings.search_api_key.clone(),
            settings.search_engine_id.clone(),
            endpoint,
        ),
        None => SearchConfig::new(
            settings.search_api_key.clone(),
            settings.search_engine_id.clone(),
        ),
    }
    .context("Invalid search endpoint URL")?;

    Ok(study_registry(
        CalendarTool::new(calendar, runtime.clone()),
        SearchTool::new(search, runtime.clone()),
        FlashcardTool::new(&settings.flashcards_path),
    )?)
}

fn build_provider(settings: &InferenceSettings) -> Result<Arc<dyn LLMProvider>> {
    let Some(api_key) = settings.api_key.clone() else {
        bail!(
            "No API key for the {:?} provider; set MENTOR__INFERENCE__API_KEY or GOOGLE_API_KEY",
            settings.provider
        );
    };

    let retry = RetryConfig::new()
        .with_max_retries(settings.max_retries)
        .with_base_delay_ms(settings.base_delay_ms);

    let provider: Arc<dyn LLMProvider> = match settings.provider {
        ProviderKind::Gemini => {
            let base = settings
                .base_url
                .as_deref()
                .unwrap_or(gemini::DEFAULT_BASE_URL);
            let base_url = Url::parse(base).context("Invalid Gemini base URL")?;
            Arc::new(GeminiProvider::new(
                GeminiConfig::new(api_key, base_url).with_retry(retry),
            ))
        }
        ProviderKind::OpenAI => {
            let base = settings
                .base_url
                .as_deref()
                .unwrap_or(OPENAI_DEFAULT_BASE_URL);
            let base_url = Url::parse(base).context("Invalid OpenAI base URL")?;
            Arc::new(OpenAIProvider::new(
                OpenAIConfig::new(api_key, base_url).with_retry(retry),
            ))
        }
    };
    Ok(provider)
}
