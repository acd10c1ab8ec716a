//! Crate-wide error type.
//!
//! Every failure that can reach an HTTP handler is a variant here, so the
//! response body is always `{"error": "<message>"}` with a status code that
//! matches the failure class. Nothing in this enum ever propagates past the
//! handler boundary.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing content-length header")]
    MissingContentLength,
    #[error("Incomplete request body: expected {expected} bytes, got {got}")]
    IncompleteBody { expected: usize, got: usize },
    #[error("Request body too large: {0} bytes")]
    BodyTooLarge(usize),
    #[error("Failed to save configuration: {0}")]
    SaveConfig(String),
    #[error("API endpoint not found")]
    ApiNotFound,
    #[error("internal error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("telegram error: {0}")]
    Telegram(#[from] crate::telegram::TelegramError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::MissingContentLength => StatusCode::BAD_REQUEST,
            Error::IncompleteBody { .. } => StatusCode::BAD_REQUEST,
            Error::BodyTooLarge(_) => StatusCode::BAD_REQUEST,
            Error::ApiNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
