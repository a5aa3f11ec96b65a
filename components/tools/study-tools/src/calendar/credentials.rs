//! OAuth authorized-user token handling for the calendar.
//!
//! The token file is the standard authorized-user JSON document. An expired
//! access token is refreshed with the stored refresh token and written back.
//! The interactive consent flow is not performed here: without a usable
//! token the caller gets [`CredentialError::AuthorizationRequired`].

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// OAuth token endpoint used when the file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed early.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Failures resolving an access token.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// No token file, or it holds neither a valid token nor a refresh token.
    #[error("cần cấp quyền truy cập Google Calendar: không có token hợp lệ tại {path}")]
    AuthorizationRequired {
        /// Token file that was inspected.
        path: PathBuf,
    },

    /// The token file could not be read or written.
    #[error("không thể truy cập tệp token {path}: {source}")]
    Io {
        /// Token file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The token file is not valid JSON.
    #[error("tệp token {path} bị hỏng: {source}")]
    Corrupt {
        /// Token file.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The token endpoint rejected the refresh.
    #[error("làm mới token thất bại (HTTP {status}): {body}")]
    RefreshRejected {
        /// Status returned by the token endpoint.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// The token endpoint could not be reached.
    #[error("không thể kết nối máy chủ xác thực: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authorized-user credentials as stored on disk.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    expiry: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for AuthorizedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedUser")
            .field("has_token", &self.token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("token_uri", &self.token_uri)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl AuthorizedUser {
    /// Returns `true` if the access token expires within the skew window.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .is_some_and(|expiry| now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry)
    }

    /// The access token, if present and not expired.
    #[must_use]
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        self.token.as_deref().filter(|_| !self.is_expired(now))
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Loads, refreshes and persists the calendar token file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    client: Client,
}

impl CredentialStore {
    /// Creates a store over `path`.
    pub fn new(path: impl AsRef<Path>, client: Client) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            client,
        }
    }

    /// Token file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a usable access token, refreshing it if it has expired.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::AuthorizationRequired`] when no token can be
    /// obtained without user consent, or an I/O or HTTP error.
    pub async fn access_token(&self) -> Result<String, CredentialError> {
        let mut user = self.load()?;
        let now = Utc::now();

        if let Some(token) = user.valid_token(now) {
            return Ok(token.to_string());
        }

        let Some(refresh_token) = user.refresh_token.clone() else {
            return Err(self.authorization_required());
        };

        debug!(token_uri = %user.token_uri, "Refreshing calendar access token");
        let refreshed = self.refresh(&user, &refresh_token).await?;

        user.token = Some(refreshed.access_token.clone());
        user.expiry = refreshed
            .expires_in
            .and_then(Duration::try_seconds)
            .and_then(|span| now.checked_add_signed(span));
        if let Some(rotated) = refreshed.refresh_token {
            user.refresh_token = Some(rotated);
        }
        self.save(&user)?;
        info!(path = %self.path.display(), "Calendar access token refreshed");

        Ok(refreshed.access_token)
    }

    async fn refresh(
        &self,
        user: &AuthorizedUser,
        refresh_token: &str,
    ) -> Result<RefreshResponse, CredentialError> {
        let mut form = url::form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", "refresh_token")
            .append_pair("refresh_token", refresh_token);
        if let Some(client_id) = &user.client_id {
            form.append_pair("client_id", client_id);
        }
        if let Some(client_secret) = &user.client_secret {
            form.append_pair("client_secret", client_secret);
        }

        let res = self
            .client
            .post(&user.token_uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form.finish())
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => Ok(res.json().await?),
            status => {
                let body = res.text().await.unwrap_or_default();
                Err(CredentialError::RefreshRejected { status, body })
            }
        }
    }

    fn authorization_required(&self) -> CredentialError {
        CredentialError::AuthorizationRequired {
            path: self.path.clone(),
        }
    }

    fn load(&self) -> Result<AuthorizedUser, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(self.authorization_required());
            }
            Err(source) => {
                return Err(CredentialError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| CredentialError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, user: &AuthorizedUser) -> Result<(), CredentialError> {
        let io_err = |source| CredentialError::Io {
            path: self.path.clone(),
            source,
        };

        let raw = serde_json::to_string(user).map_err(|source| CredentialError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, raw).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)
    }
}
