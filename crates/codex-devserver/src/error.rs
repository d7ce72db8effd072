//! Dev server error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DevServerError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for DevServerError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            DevServerError::AccessDenied(_) => (StatusCode::FORBIDDEN, "Access denied"),
            DevServerError::NotFound(_) => (StatusCode::NOT_FOUND, "File not found"),
            DevServerError::Io(e) => {
                error!(error = %e, "static file read failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type DevServerResult<T> = Result<T, DevServerError>;
