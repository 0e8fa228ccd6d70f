//! API Middleware
//!
//! The account access-policy guard and request logging.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::TOKEN_HEADER;
use crate::error::AppError;

use super::ApiState;

// =========================================================================
// Access-policy guard
// =========================================================================

/// Guard for identity-bound account routes (`/account/{id}`).
///
/// Ordered checks, each denying on failure before the next runs:
/// token header present, token verifies, path id parses, account exists,
/// claimed account number matches the stored one. Only then does the
/// inner handler run. The guard writes nothing on the success path.
pub async fn account_auth_middleware(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Request without {} header denied", TOKEN_HEADER);
            AppError::PermissionDenied
        })?;

    // Verification strictly precedes the storage lookup so an
    // unauthenticated caller can never trigger account reads.
    let claims = state.verifier.verify(token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        AppError::PermissionDenied
    })?;

    let id: i64 = id.parse().map_err(|_| {
        tracing::warn!("Invalid account id in path: {}", id);
        AppError::PermissionDenied
    })?;

    // Fail closed: a storage error denies rather than surfacing a 5xx.
    let account = state
        .store
        .get_account(id)
        .await
        .map_err(|e| {
            tracing::error!("Account lookup failed during auth: {}", e);
            AppError::PermissionDenied
        })?
        .ok_or(AppError::PermissionDenied)?;

    if account.number != claims.account_number {
        tracing::warn!(
            account_id = id,
            "Token claims do not match the requested account"
        );
        return Err(AppError::AccountNumberMismatch);
    }

    Ok(next.run(request).await)
}

// =========================================================================
// Header masking
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[
    TOKEN_HEADER,
    "authorization",
    "cookie",
    "set-cookie",
];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();

    // Mask sensitive headers
    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}
