//! Error types for snapsrv
//!
//! The core raises typed errors; the axum layer maps each kind to a
//! status code without the core knowing anything about HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias
pub type Result<T> = std::result::Result<T, AlarmError>;

#[derive(Error, Debug)]
pub enum AlarmError {
    /// Malformed or out-of-range client input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No snapshot cached for this token (expired, evicted, or never issued)
    #[error("unknown snapshot token: {0}")]
    UnknownToken(Uuid),

    /// Index outside the snapshot's [0, len) range
    #[error("index {index} out of range for snapshot of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Alarm referenced by a snapshot no longer exists in the store
    #[error("alarm not found: {0}")]
    AlarmNotFound(Uuid),

    /// Recognized update shape but unrecognized action value
    #[error("unsupported update action: {action}, value: {value}")]
    UnsupportedAction { action: String, value: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal failure; details are logged, never returned to the client
    #[error("internal error: {0}")]
    Internal(String),
}

impl AlarmError {
    /// True for the kinds the read path treats as "build a fresh snapshot"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AlarmError::UnknownToken(_)
                | AlarmError::IndexOutOfRange { .. }
                | AlarmError::AlarmNotFound(_)
        )
    }
}

impl From<anyhow::Error> for AlarmError {
    fn from(err: anyhow::Error) -> Self {
        AlarmError::Internal(err.to_string())
    }
}

impl IntoResponse for AlarmError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AlarmError::InvalidArgument(_) | AlarmError::UnsupportedAction { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AlarmError::UnknownToken(_)
            | AlarmError::IndexOutOfRange { .. }
            | AlarmError::AlarmNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AlarmError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            AlarmError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
