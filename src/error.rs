use crate::chat::DecodeError;
use crate::upstream::UpstreamError;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::path::PathBuf;

/// Startup failures. Any of these stops the process before it serves.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read model table {}: {source}", path.display())]
    ModelTableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model table {} is not a flat JSON object of strings: {source}", path.display())]
    ModelTableParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid metrics path {0:?}")]
    InvalidMetricsPath(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("failed to install metrics recorder: {0}")]
    Metrics(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}

/// Per-request failure rendered as `{"code": <status>, "error": <message>}`.
///
/// `code` is only emitted for client-facing errors (bad request, not found);
/// dispatch failures carry just the message.
#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub include_code: bool,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            include_code: false,
        }
    }

    pub fn with_code(mut self) -> Self {
        self.include_code = true;
        self
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not found").with_code()
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, err.to_string()).with_code()
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text()).with_code()
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        let message = match err {
            UpstreamError::Serialize(_) => "Failed to marshal modified data",
            UpstreamError::Network(_) => "Failed to forward request",
            UpstreamError::Body(_) => "Failed to read response body",
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.include_code.then(|| self.status.as_u16()),
            error: self.message,
        };
        (self.status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
