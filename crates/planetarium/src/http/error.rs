//! Mapping of errors onto HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::error::Error;

/// Code sent with 413 responses.
pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";

/// An error ready to be sent to the client.
///
/// The body is `{"error": {"code": ..., "message": ...}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }
}

/// HTTP status for a crate error.
#[must_use]
pub fn status_for(err: &Error) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            debug!("Rejected request: {}", err);
        } else {
            error!("Request failed: {}", err);
        }
        Self::new(status_for(&err), err.code(), err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        // Body limit overruns keep their own status.
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(err.status(), PAYLOAD_TOO_LARGE, err.body_text());
        }
        Error::invalid_form(err.body_text()).into()
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Error::invalid_form(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidQuery {
            message: rejection.body_text(),
        }
        .into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}
