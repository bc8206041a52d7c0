//! Unified error type for every client operation.

use reqwest::StatusCode;

/// Client error taxonomy.
///
/// Transport and HTTP failures are never retried or swallowed; they reach the
/// caller exactly as produced.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached (DNS, refused connection, platform timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Build an HTTP status error from a response body, extracting the
    /// server message from `message`, `error` or `msg` when the body is JSON.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                ["message", "error", "msg"].iter().find_map(|key| {
                    json.get(*key)
                        .and_then(|v| v.as_str())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
            })
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        Self::HttpStatus {
            status: status.as_u16(),
            message,
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error represents an auth failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
