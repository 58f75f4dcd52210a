//! Errors surfaced by the MiniURL client.

use serde::Serialize;
use std::fmt;

/// Shown when input cannot be normalized into a URL.
pub const INVALID_URL_MESSAGE: &str =
    "Please enter a valid URL (e.g., example.com or https://example.com)";

/// Minify/resolve related errors.
/// Each variant maps to one user-facing message; `Display` renders that message.
/// 1. InvalidUrl(String) - input could not be normalized (carries the raw input)
/// 2. InvalidRequest(String) - a request field broke its length limits, nothing was sent
/// 3. Timeout(String) - request did not complete in time
/// 4. Validation(String) - API answered 422; carries the first `detail[].msg`
/// 5. RateLimited(String) - API answered 429; carries its `error` text
/// 6. NotFound(String) - API answered 404 for an alias
/// 7. ServerError(u16) - API answered 5xx
/// 8. Network(String) - connection could not be made or was dropped
/// 9. InvalidResponse(String) - success status but the body lacked the expected field
/// 10. Unexpected(u16, String) - any other non-success status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MinifyError {
    InvalidUrl(String),
    InvalidRequest(String),
    Timeout(String),
    Validation(String),
    RateLimited(String),
    NotFound(String),
    ServerError(u16),
    Network(String),
    InvalidResponse(String),
    Unexpected(u16, String),
}

impl MinifyError {
    /// HTTP status the API answered with, when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            MinifyError::Validation(_) => Some(422),
            MinifyError::RateLimited(_) => Some(429),
            MinifyError::NotFound(_) => Some(404),
            MinifyError::ServerError(code) | MinifyError::Unexpected(code, _) => Some(*code),
            _ => None,
        }
    }

    /// True for failures detected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, MinifyError::InvalidUrl(_) | MinifyError::InvalidRequest(_))
    }
}

impl fmt::Display for MinifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinifyError::InvalidUrl(_) => f.write_str(INVALID_URL_MESSAGE),
            MinifyError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            MinifyError::Timeout(_) => f.write_str("Request timed out"),
            MinifyError::Validation(msg) => f.write_str(msg),
            MinifyError::RateLimited(msg) => f.write_str(msg),
            MinifyError::NotFound(msg) => f.write_str(msg),
            MinifyError::ServerError(_) => f.write_str("Server error. Please try again."),
            MinifyError::Network(_) => f.write_str("Network error. Check your connection."),
            MinifyError::InvalidResponse(_) => f.write_str("Invalid response from server"),
            MinifyError::Unexpected(..) => f.write_str("Something went wrong"),
        }
    }
}

impl std::error::Error for MinifyError {}
