//! The `Google_Calendar_Reader` tool.
//!
//! Input is the number of days ahead to look. Events from now until then are
//! read from the primary calendar and rendered one per line.

mod credentials;

pub use credentials::{AuthorizedUser, CredentialError, CredentialStore, DEFAULT_TOKEN_URI};

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, TimeDelta, Utc};
use mentor_sdk::tools::constants::CALENDAR;
use mentor_sdk::{Tool, ToolError};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::debug;

/// Public Calendar API base.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

/// Upper bound on events returned for one request.
pub const MAX_EVENTS: u32 = 15;

const DESCRIPTION: &str = "Rất hữu ích để tìm hiểu về các sự kiện, kỳ thi, hoặc hạn chót sắp tới \
    từ Google Calendar. Đầu vào của công cụ này là một con số, đại diện cho số ngày cần kiểm tra \
    trong tương lai.";

/// Where the calendar tool finds its token and API.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Authorized-user token file.
    pub token_path: PathBuf,
    /// Calendar API base URL, ending with a slash.
    pub api_base: Url,
}

impl CalendarConfig {
    /// Creates a config against the public API.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in base; the signature matches
    /// [`with_api_base`](Self::with_api_base).
    pub fn new(token_path: impl Into<PathBuf>) -> Result<Self, url::ParseError> {
        Self::with_api_base(token_path, DEFAULT_API_BASE)
    }

    /// Creates a config against a custom API base.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base` is not a valid URL.
    pub fn with_api_base(
        token_path: impl Into<PathBuf>,
        api_base: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            token_path: token_path.into(),
            api_base: Url::parse(api_base)?,
        })
    }
}

#[derive(Error, Debug)]
enum CalendarError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("Đã xảy ra lỗi: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Đã xảy ra lỗi: URL không hợp lệ: {0}")]
    Url(#[from] url::ParseError),

    #[error("Đã xảy ra lỗi: HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    summary: Option<String>,
    start: EventTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<NaiveDate>,
}

impl EventTime {
    /// `Monday, 06/05/2024 lúc 09:30`; all-day events show midnight.
    fn display(&self) -> Option<String> {
        const FORMAT: &str = "%A, %d/%m/%Y lúc %H:%M";

        if let Some(raw) = &self.date_time {
            return DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.format(FORMAT).to_string());
        }
        self.date
            .map(|date| date.and_time(NaiveTime::MIN).format(FORMAT).to_string())
    }
}

fn render_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "Không tìm thấy sự kiện nào trong lịch của bạn.".to_string();
    }

    let mut out = "Đây là các sự kiện sắp tới của bạn:\n".to_string();
    for event in events {
        let when = event
            .start
            .display()
            .unwrap_or_else(|| "Không rõ thời gian".to_string());
        let summary = event.summary.as_deref().unwrap_or("(Không có tiêu đề)");
        let _ = writeln!(out, "- {when}: {summary}");
    }
    out
}

fn parse_days(input: &str) -> Result<u32, ToolError> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|days| *days > 0)
        .ok_or_else(|| {
            ToolError::invalid(
                CALENDAR,
                format!("đầu vào phải là một số ngày dương, nhận được '{}'", input.trim()),
            )
        })
}

/// The `[now, now + days]` window, or an input error when it leaves the
/// representable date range.
fn time_window(
    now: DateTime<Utc>,
    days: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ToolError> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_add_signed(span))
        .map(|end| (now, end))
        .ok_or_else(|| ToolError::invalid(CALENDAR, format!("{days} ngày là quá xa")))
}

/// Reads upcoming events from the user's primary calendar.
#[derive(Debug)]
pub struct CalendarTool {
    client: Client,
    credentials: CredentialStore,
    api_base: Url,
    runtime: Handle,
}

impl CalendarTool {
    /// Creates the tool. Requests are driven on `runtime`.
    #[must_use]
    pub fn new(config: CalendarConfig, runtime: Handle) -> Self {
        let client = Client::new();
        Self {
            credentials: CredentialStore::new(&config.token_path, client.clone()),
            client,
            api_base: config.api_base,
            runtime,
        }
    }

    async fn upcoming(
        &self,
        (start, end): (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<Vec<Event>, CalendarError> {
        let token = self.credentials.access_token().await?;

        let mut url = self.api_base.join("calendars/primary/events")?;
        url.query_pairs_mut()
            .append_pair("timeMin", &start.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("timeMax", &end.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("maxResults", &MAX_EVENTS.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let res = self.client.get(url).bearer_auth(token).send().await?;

        match res.status() {
            StatusCode::OK => {
                let body: EventList = res.json().await?;
                Ok(body.items)
            }
            status => {
                let body = res.text().await.unwrap_or_default();
                Err(CalendarError::Status { status, body })
            }
        }
    }
}

impl Tool for CalendarTool {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(CALENDAR)
    }

    fn description(&self) -> Cow<'static, str> {
        Cow::Borrowed(DESCRIPTION)
    }

    fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let days = parse_days(input)?;
        let window = time_window(Utc::now(), days)?;
        debug!(days, "Reading calendar");

        match self.runtime.block_on(self.upcoming(window)) {
            Ok(events) => Ok(render_events(&events)),
            Err(CalendarError::Credentials(e @ CredentialError::AuthorizationRequired { .. })) => {
                Err(ToolError::Misconfigured {
                    tool: CALENDAR.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(ToolError::execution(CALENDAR, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event(summary: &str, start: serde_json::Value) -> Event {
        serde_json::from_value(serde_json::json!({"summary": summary, "start": start})).unwrap()
    }

    #[test]
    fn test_render_timed_and_all_day_events() {
        let events = vec![
            event("Thi Toán", serde_json::json!({"dateTime": "2024-05-06T09:30:00+07:00"})),
            event("Nộp bài", serde_json::json!({"date": "2024-05-07"})),
        ];

        assert_eq!(
            render_events(&events),
            "Đây là các sự kiện sắp tới của bạn:\n\
             - Monday, 06/05/2024 lúc 09:30: Thi Toán\n\
             - Tuesday, 07/05/2024 lúc 00:00: Nộp bài\n"
        );
    }

    #[test]
    fn test_render_no_events() {
        assert_eq!(
            render_events(&[]),
            "Không tìm thấy sự kiện nào trong lịch của bạn."
        );
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days(" 7 ").unwrap(), 7);
        assert!(parse_days("0").is_err());
        assert!(parse_days("-3").is_err());
        assert!(parse_days("một tuần").is_err());
    }

    #[test]
    fn test_time_window_rejects_out_of_range_days() {
        let now = Utc::now();
        let (start, end) = time_window(now, 7).unwrap();
        assert_eq!(start, now);
        assert_eq!(end - start, TimeDelta::days(7));

        let err = time_window(now, 100_000_000).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(time_window(now, u32::MAX).is_err());
    }

    fn tool_for(server: &MockServer, dir: &TempDir) -> CalendarTool {
        let config = CalendarConfig::with_api_base(
            dir.path().join("token.json"),
            &format!("{}/calendar/v3/", server.uri()),
        )
        .unwrap();
        CalendarTool::new(config, Handle::current())
    }

    async fn invoke(tool: CalendarTool, input: &'static str) -> Result<String, ToolError> {
        tokio::task::spawn_blocking(move || tool.invoke(input))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_lists_events_with_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendar/v3/calendars/primary/events"))
            .and(header("authorization", "Bearer live-token"))
            .and(query_param("maxResults", "15"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"summary": "Thi Hóa", "start": {"dateTime": "2024-06-01T08:00:00Z"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("token.json"),
            serde_json::json!({"token": "live-token"}).to_string(),
        )
        .unwrap();

        let out = invoke(tool_for(&server, &dir), "7").await.unwrap();
        assert!(out.contains("- Saturday, 01/06/2024 lúc 08:00: Thi Hóa"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_token_is_misconfigured() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        let err = invoke(tool_for(&server, &dir), "3").await.unwrap_err();
        assert!(matches!(err, ToolError::Misconfigured { .. }));
        assert!(err.to_string().contains("cần cấp quyền"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_api_error_is_execution_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("token.json"),
            serde_json::json!({"token": "revoked"}).to_string(),
        )
        .unwrap();

        let err = invoke(tool_for(&server, &dir), "3").await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_huge_day_count_is_invalid_input() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("token.json"),
            serde_json::json!({"token": "live-token"}).to_string(),
        )
        .unwrap();

        let err = invoke(tool_for(&server, &dir), "100000000").await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert!(err.to_string().contains("100000000"));
    }
}
