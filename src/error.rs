//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("account number does not match token claims")]
    AccountNumberMismatch,

    #[error("Account not found: {0}")]
    AccountNotFound(i64),

    // Auth errors - signing failures surface as 5xx, the rest deny
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // 403 Forbidden - both denial outcomes share the access
            // result and differ only in the reason
            AppError::PermissionDenied => {
                (StatusCode::FORBIDDEN, "permission_denied", None)
            }
            AppError::AccountNumberMismatch => {
                (StatusCode::FORBIDDEN, "account_number_mismatch", None)
            }

            // 404 Not Found
            AppError::AccountNotFound(id) => {
                (StatusCode::NOT_FOUND, "account_not_found", Some(id.to_string()))
            }

            // Auth errors reached outside the guard. Empty-secret and
            // signing failures are process faults; anything else denies.
            AppError::Auth(auth_err) => {
                use crate::auth::AuthError;
                match auth_err {
                    AuthError::EmptySecret | AuthError::Signing(_) => {
                        tracing::error!("Token signing error: {}", auth_err);
                        (StatusCode::INTERNAL_SERVER_ERROR, "token_signing_failed", None)
                    }
                    _ => (StatusCode::FORBIDDEN, "invalid_token", None),
                }
            }

            // 500 Internal Server Error
            AppError::Store(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
