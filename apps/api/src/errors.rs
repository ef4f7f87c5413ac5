#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::GatewayError;
use crate::profile::store::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Cloud push/pull failures never appear here: the sync adapter swallows
/// them and the service degrades to local-only operation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The identity lookup found something but refused to trust it —
    /// distinct from a gateway failure so the caller can say "found
    /// something, but didn't trust it" rather than "found nothing".
    #[error("Identity mismatch")]
    IdentityMismatch,

    #[error("Model credential missing")]
    CredentialMissing,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::IdentityMismatch => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "IDENTITY_MISMATCH",
                "Identity mismatch: information found does not match your criteria".to_string(),
            ),
            AppError::CredentialMissing => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIAL_MISSING",
                "A model API credential is required for this feature".to_string(),
            ),
            AppError::Gateway(GatewayError::CredentialMissing) => (
                StatusCode::UNAUTHORIZED,
                "CREDENTIAL_MISSING",
                "A model API credential is required for this feature".to_string(),
            ),
            AppError::Gateway(e) => {
                tracing::error!("gateway error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A local storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
