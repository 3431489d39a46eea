//! Markdown asset resolution and loading.

use crate::cancel::Cancellation;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Status code reported when no HTTP response was obtained.
///
/// Never a real HTTP status.
pub const UNREACHABLE: u16 = 999;

/// Maps a clean navigation path to the markdown asset behind it.
///
/// `.md` paths are returned unchanged, directory paths get `index.md`
/// appended and anything else gets `.md` appended.
pub fn resolve(path: &str) -> String {
    if path.ends_with(".md") {
        path.to_string()
    } else if path.ends_with('/') {
        format!("{path}index.md")
    } else {
        format!("{path}.md")
    }
}

/// Outcome class of an asset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "camelCase")]
pub enum StatusClass {
    /// Request in flight.
    Pending,
    /// An HTTP response with this status was received.
    Http(u16),
    /// No response (transport failure or cancellation).
    Unreachable,
}

impl StatusClass {
    /// Classifies a numeric status, mapping the sentinel to `Unreachable`.
    pub fn from_code(code: u16) -> Self {
        if code == UNREACHABLE {
            StatusClass::Unreachable
        } else {
            StatusClass::Http(code)
        }
    }

    /// Numeric status, with the sentinel for `Unreachable`.
    pub fn code(self) -> Option<u16> {
        match self {
            StatusClass::Pending => None,
            StatusClass::Http(code) => Some(code),
            StatusClass::Unreachable => Some(UNREACHABLE),
        }
    }

    /// Returns true for 2xx responses.
    pub fn is_success(self) -> bool {
        matches!(self, StatusClass::Http(code) if (200..300).contains(&code))
    }
}

/// The current result for a navigation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetResult {
    /// Outcome class.
    pub status: StatusClass,
    /// Body text, present only for successful responses.
    pub text: Option<String>,
}

impl AssetResult {
    /// The placeholder result while a request is in flight.
    pub fn pending() -> Self {
        Self {
            status: StatusClass::Pending,
            text: None,
        }
    }

    /// A result without any response.
    pub fn unreachable() -> Self {
        Self {
            status: StatusClass::Unreachable,
            text: None,
        }
    }

    /// A result for an HTTP response. The body is kept for 2xx only.
    pub fn http(status: u16, text: impl Into<String>) -> Self {
        let status = StatusClass::Http(status);
        Self {
            status,
            text: status.is_success().then(|| text.into()),
        }
    }

    /// The error to display for this result, if it is a failure.
    pub fn error(&self) -> Option<AssetError> {
        AssetError::from_status(self.status)
    }
}

/// A failed asset load as presented to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "code", rename_all = "camelCase")]
pub enum AssetError {
    /// 401.
    #[error("401 Restricted Document")]
    Unauthorized,
    /// 403.
    #[error("403 Forbidden Document")]
    Forbidden,
    /// 404.
    #[error("404 Document Not Found")]
    NotFound,
    /// Any other non-2xx status.
    #[error("{0} Download Error")]
    Download(u16),
    /// No response.
    #[error("Document Unreachable")]
    Unreachable,
}

impl AssetError {
    /// The error for a status, `None` for pending and successful results.
    pub fn from_status(status: StatusClass) -> Option<Self> {
        let error = match status {
            StatusClass::Pending => return None,
            StatusClass::Unreachable => AssetError::Unreachable,
            status if status.is_success() => return None,
            StatusClass::Http(401) => AssetError::Unauthorized,
            StatusClass::Http(403) => AssetError::Forbidden,
            StatusClass::Http(404) => AssetError::NotFound,
            StatusClass::Http(code) => AssetError::Download(code),
        };
        Some(error)
    }

    /// Numeric status of the failure.
    pub fn code(self) -> u16 {
        match self {
            AssetError::Unauthorized => 401,
            AssetError::Forbidden => 403,
            AssetError::NotFound => 404,
            AssetError::Download(code) => code,
            AssetError::Unreachable => UNREACHABLE,
        }
    }

    /// The message without the status code.
    pub fn message(self) -> &'static str {
        match self {
            AssetError::Unauthorized => "Restricted Document",
            AssetError::Forbidden => "Forbidden Document",
            AssetError::NotFound => "Document Not Found",
            AssetError::Download(_) => "Download Error",
            AssetError::Unreachable => "Document Unreachable",
        }
    }
}

/// A response returned by a [`Fetch`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status.
    pub status: u16,
    /// Response body.
    pub text: String,
}

/// Transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was aborted through its token.
    #[error("request cancelled")]
    Cancelled,
    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// The transport seam: one GET request per navigation.
#[async_trait(?Send)]
pub trait Fetch {
    /// Fetches `url`. Implementations should abort when `token` is cancelled.
    async fn get(&self, url: &str, token: &Cancellation) -> Result<FetchResponse, FetchError>;
}

/// Loads one asset.
///
/// Transport failures and cancellation give [`StatusClass::Unreachable`].
/// A result for a token cancelled meanwhile is reported as unreachable and
/// must be discarded by the caller.
pub async fn load<F: Fetch + ?Sized>(fetch: &F, url: &str, token: &Cancellation) -> AssetResult {
    if token.is_cancelled() {
        return AssetResult::unreachable();
    }

    let response = fetch.get(url, token).await;
    token.complete();

    if token.is_cancelled() {
        log::debug!("Dropping response for cancelled request: {url}");
        return AssetResult::unreachable();
    }

    match response {
        Ok(FetchResponse { status, text }) => {
            log::debug!("Fetched {url}: {status}");
            AssetResult::http(status, text)
        }
        Err(err) => {
            log::debug!("Fetching {url} failed: {err}");
            AssetResult::unreachable()
        }
    }
}
