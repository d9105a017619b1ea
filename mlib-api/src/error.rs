//! API error type
//!
//! Every handler returns [`ApiResult`]. Errors render as
//! `{"message": "..."}`; server errors also echo the underlying cause in an
//! `error` field for diagnostics.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing/invalid upload or form field (400)
    #[error("{0}")]
    BadRequest(String),

    /// Uploaded file exceeds the size cap (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Unknown id (404)
    #[error("{0}")]
    NotFound(String),

    /// Store or filesystem failure (500)
    #[error("{message}: {cause}")]
    Internal { message: String, cause: String },
}

impl ApiError {
    pub fn song_not_found() -> Self {
        ApiError::NotFound("Song not found".to_string())
    }

    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            cause: cause.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Attach a handler-level message to a store error
///
/// Input errors keep their own message; everything else becomes a 500 with
/// `message` as the summary.
pub trait ApiContext<T> {
    fn api_context(self, message: &str) -> ApiResult<T>;
}

impl<T> ApiContext<T> for mlib_common::Result<T> {
    fn api_context(self, message: &str) -> ApiResult<T> {
        self.map_err(|e| match e {
            mlib_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            mlib_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::internal(message, other),
        })
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::BadRequest(format!("Invalid multipart body: {}", e.body_text()))
        }
    }
}

/// Body that isn't `multipart/form-data` at all
impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::BadRequest(format!("Expected a multipart form: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Internal { message, cause } => {
                error!("{}: {}", message, cause);
                json!({ "message": message, "error": cause })
            }
            ApiError::BadRequest(message)
            | ApiError::PayloadTooLarge(message)
            | ApiError::NotFound(message) => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}
