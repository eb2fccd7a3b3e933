//! Unified error handling
//!
//! `AgentError` is the typed error every internal stage returns; workflow
//! handlers flatten it to a status string at the HTTP boundary. `ApiError`
//! only exists for responses that must carry an HTTP status code (auth).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Workflow error taxonomy.
///
/// Every remote operation, configuration lookup and collaborator call maps
/// into one of these variants; nothing below the API layer deals in strings.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Authentication or transport failure while opening a session.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Operation attempted on a closed or never-opened session.
    #[error("session is not connected")]
    NotConnected,

    /// Transport failure after the session was established.
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote command exited with a nonzero status.
    #[error("command failed with exit code {code}: {stderr}")]
    CommandFailed { code: u32, stderr: String },

    /// File upload to the remote host failed.
    #[error("file transfer failed: {0}")]
    Transfer(String),

    /// A required host, credential or database parameter is absent.
    #[error("missing configuration: {0}")]
    ConfigurationMissing(String),

    /// Malformed structured input from the caller.
    #[error("invalid payload: {0}")]
    PayloadFormat(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("log analysis failed: {0}")]
    Analyzer(String),
}

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Errors that surface as HTTP status codes instead of status strings.
#[derive(Debug)]
pub enum ApiError {
    /// 401 - API key invalid or missing.
    Unauthorized,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid or missing API key".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = AgentError::CommandFailed {
            code: 127,
            stderr: "sh: java: not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command failed with exit code 127: sh: java: not found"
        );
    }

    #[test]
    fn test_not_connected_display() {
        assert_eq!(
            AgentError::NotConnected.to_string(),
            "session is not connected"
        );
    }
}
