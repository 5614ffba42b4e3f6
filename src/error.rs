use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for hub API responses.
#[derive(Debug)]
pub enum HubError {
    /// Upstream KV store call failed.
    Kv(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl HubError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Kv(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    /// Bare message without the log prefix, for response bodies.
    pub fn message(&self) -> &str {
        match self {
            Self::Kv(m)
            | Self::NotFound(m)
            | Self::BadRequest(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(msg) => write!(f, "kv_error: {msg}"),
            Self::NotFound(msg) => write!(f, "not_found: {msg}"),
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for HubError {}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let body = match &self {
            // Store failures keep the raw cause out of the headline message.
            Self::Kv(details) => json!({ "error": "Internal server error", "details": details }),
            other => json!({ "error": other.message() }),
        };
        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<redis::RedisError> for HubError {
    fn from(e: redis::RedisError) -> Self {
        Self::Kv(e.to_string())
    }
}

impl From<serde_json::Error> for HubError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<std::io::Error> for HubError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
