//! The `Study_Material_Searcher` tool, backed by the Custom Search JSON API.

use mentor_sdk::tools::constants::SEARCH;
use mentor_sdk::{Tool, ToolError};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt::Write as _;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::debug;

/// Public Custom Search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Number of results rendered for the model.
pub const RESULT_COUNT: u8 = 3;

const DESCRIPTION: &str = "Rất hữu ích để tìm các bài giảng, video, hoặc bài viết về một chủ đề \
    học tập cụ thể. Ví dụ đầu vào: 'bài giảng về tích phân lớp 12'.";

const NO_SNIPPET: &str = "Không có mô tả.";

/// Credentials and endpoint for the search API.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// API key, if configured.
    pub api_key: Option<SecretString>,
    /// Programmable search engine id, if configured.
    pub engine_id: Option<String>,
    /// Endpoint to query.
    pub endpoint: Url,
}

impl SearchConfig {
    /// Creates a config against the public endpoint.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in endpoint; the signature matches
    /// [`with_endpoint`](Self::with_endpoint).
    pub fn new(
        api_key: Option<SecretString>,
        engine_id: Option<String>,
    ) -> Result<Self, url::ParseError> {
        Self::with_endpoint(api_key, engine_id, DEFAULT_ENDPOINT)
    }

    /// Creates a config against a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn with_endpoint(
        api_key: Option<SecretString>,
        engine_id: Option<String>,
        endpoint: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            api_key,
            engine_id,
            endpoint: Url::parse(endpoint)?,
        })
    }
}

#[derive(Error, Debug)]
enum SearchError {
    #[error("Đã xảy ra lỗi khi tìm kiếm: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Đã xảy ra lỗi khi tìm kiếm: HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    link: String,
    snippet: Option<String>,
}

/// Finds lectures, videos and articles for a study topic.
#[derive(Debug)]
pub struct SearchTool {
    client: Client,
    config: SearchConfig,
    runtime: Handle,
}

impl SearchTool {
    /// Creates the tool. Requests are driven on `runtime`.
    #[must_use]
    pub fn new(config: SearchConfig, runtime: Handle) -> Self {
        Self {
            client: Client::new(),
            config,
            runtime,
        }
    }

    fn request_url(&self, api_key: &SecretString, engine_id: &str, query: &str) -> Url {
        let mut url = self.config.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", api_key.expose_secret())
            .append_pair("cx", engine_id)
            .append_pair("q", query)
            .append_pair("num", &RESULT_COUNT.to_string());
        url
    }

    async fn search(&self, url: Url) -> Result<Option<SearchResponse>, SearchError> {
        let res = self.client.get(url).send().await?;

        match res.status() {
            StatusCode::OK => Ok(Some(res.json().await?)),
            StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN => Ok(None),
            status => {
                let body = res.text().await.unwrap_or_default();
                Err(SearchError::Status { status, body })
            }
        }
    }
}

fn render_results(query: &str, items: &[SearchItem]) -> String {
    let mut out = format!("Đây là một vài tài liệu hữu ích cho chủ đề '{query}':\n");
    for item in items.iter().take(usize::from(RESULT_COUNT)) {
        let _ = writeln!(out, "- Tiêu đề: {}", item.title);
        let _ = writeln!(out, "  Link: {}", item.link);
        let _ = writeln!(
            out,
            "  Mô tả: {}\n",
            item.snippet.as_deref().unwrap_or(NO_SNIPPET)
        );
    }
    out
}

impl Tool for SearchTool {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(SEARCH)
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(DESCRIPTION)
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ToolError::invalid(SEARCH, "từ khóa tìm kiếm không được để trống"));
        }

        let (Some(api_key), Some(engine_id)) = (&self.config.api_key, &self.config.engine_id)
        else {
            return Err(ToolError::Misconfigured {
                tool: SEARCH.to_string(),
                reason: "thiếu API Key hoặc Search Engine ID".to_string(),
            });
        };

        let url = self.request_url(api_key, engine_id, query);
        debug!(query, "Searching study materials");

        match self.runtime.block_on(self.search(url)) {
            Ok(Some(body)) if body.items.is_empty() => {
                Ok("Không tìm thấy tài liệu nào phù hợp.".to_string())
            }
            Ok(Some(body)) => Ok(render_results(query, &body.items)),
            Ok(None) => Err(ToolError::Misconfigured {
                tool: SEARCH.to_string(),
                reason: "API Key hoặc Search Engine ID không hợp lệ. Vui lòng kiểm tra lại cấu hình."
                    .to_string(),
            }),
            Err(e) => Err(ToolError::execution(SEARCH, e)),
        }
    }
}
