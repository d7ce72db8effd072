//! Gateway error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Detail message returned with every quota rejection.
pub const QUOTA_EXCEEDED_DETAIL: &str = "Daily reflection limit reached.";

/// Gateway-level errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("reflection quota exceeded for client {client} ({used} used)")]
    QuotaExceeded { client: String, used: u64 },

    #[error("invalid reflection request: {0}")]
    InvalidRequest(String),

    #[error("upstream reflection call failed: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            GatewayError::QuotaExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, QUOTA_EXCEEDED_DETAIL.to_string())
            }
            GatewayError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            GatewayError::Upstream(msg) => {
                warn!(error = %msg, "upstream reflection failed");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            GatewayError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
