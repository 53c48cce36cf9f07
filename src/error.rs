//! Error codes and the JSON error response.
//!
//! DESIGN
//! ======
//! Every service owns a `thiserror` enum and implements [`ErrorCode`] so
//! failures carry a grepable `E_*` code alongside the human message. Route
//! handlers turn those into an [`ApiError`], which renders as
//! `{"code": ..., "message": ..., "fields": {...}?}` with the HTTP status
//! chosen by the handler.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use editor::metadata::FieldErrors;
use serde::Serialize;

/// Grepable error code and retryable flag.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// An error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

/// An HTTP error with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self { status, body: ApiErrorBody { code: code.to_owned(), message: message.into(), fields: None } }
    }

    /// Build from any service error, keeping its code and message.
    #[must_use]
    pub fn from_error<E: ErrorCode>(status: StatusCode, err: &E) -> Self {
        Self::new(status, err.error_code(), err.to_string())
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.body.fields = Some(fields);
        self
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "E_BAD_REQUEST", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = %self.body.code, message = %self.body.message, "request failed");
        } else {
            tracing::debug!(code = %self.body.code, status = %self.status, "request rejected");
        }
        (self.status, Json(self.body)).into_response()
    }
}
