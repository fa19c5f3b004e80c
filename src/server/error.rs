//! Error-to-HTTP response conversion.
//!
//! Route handlers return `Result<T, ApiError>`; catalog and sync errors
//! convert into it with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vidshelf_common::Error;

use crate::scanner::{SyncError, SyncReport};

pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    /// Changes a failed refresh had already committed.
    applied: Option<SyncReport>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            applied: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        let (status, code) = match &e {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        Self::new(status, code, e.to_string())
    }
}

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        let (status, code) = match &e {
            SyncError::InvalidRoot(_) => (StatusCode::CONFLICT, "invalid_root"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "sync_error"),
        };
        Self {
            applied: e.applied(),
            ..Self::new(status, code, e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                error = %self.message,
                "Server error in API handler"
            );
        }

        let mut body = json!({
            "error": self.message,
            "code": self.code,
        });
        if let Some(applied) = self.applied {
            body["applied"] = json!(applied);
        }

        (self.status, axum::Json(body)).into_response()
    }
}
