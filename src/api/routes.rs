//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::Account;
use crate::error::AppError;

use super::ApiState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

/// Creation reply carries the account together with its access token;
/// the token exists only in this response and is never stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub account: Account,
    pub token: String,
}

/// Transfer request, accepted but not executed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAccountResponse {
    pub deleted: i64,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router.
///
/// Only the `/account/{id}` family runs behind the access-policy guard;
/// listing, creation, and transfer are open in this design.
pub fn create_router(state: ApiState) -> Router {
    let protected = Router::new()
        .route("/account/:id", get(get_account).delete(delete_account))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            super::middleware::account_auth_middleware,
        ));

    Router::new()
        .route("/account", get(list_accounts).post(create_account))
        .route("/transfer", post(transfer))
        .merge(protected)
        .with_state(state)
}

// =========================================================================
// GET /account
// =========================================================================

/// List all accounts
async fn list_accounts(State(state): State<ApiState>) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.store.list_accounts().await?;
    Ok(Json(accounts))
}

// =========================================================================
// POST /account
// =========================================================================

/// Create a new account and issue its access token.
///
/// The token is issued before the account is persisted: a signing failure
/// aborts creation, so no account exists without a usable credential.
async fn create_account(
    State(state): State<ApiState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreateAccountResponse>), AppError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "firstName and lastName must not be empty".to_string(),
        ));
    }

    let account = Account::new(request.first_name, request.last_name);
    let token = state.issuer.issue(&account)?;
    let account = state.store.create_account(account).await?;

    tracing::info!(account_id = account.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse { account, token }),
    ))
}

// =========================================================================
// GET /account/:id
// =========================================================================

/// Fetch an account by id. Runs behind the guard.
async fn get_account(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<Account>, AppError> {
    let account = state
        .store
        .get_account(id)
        .await?
        .ok_or(AppError::AccountNotFound(id))?;

    Ok(Json(account))
}

// =========================================================================
// DELETE /account/:id
// =========================================================================

/// Delete an account by id. Runs behind the guard.
async fn delete_account(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteAccountResponse>, AppError> {
    let deleted = state.store.delete_account(id).await?;
    if !deleted {
        return Err(AppError::AccountNotFound(id));
    }

    tracing::info!(account_id = id, "Account deleted");

    Ok(Json(DeleteAccountResponse { deleted: id }))
}

// =========================================================================
// POST /transfer
// =========================================================================

/// Accept a transfer request. Execution is out of scope; the request is
/// validated structurally and echoed back.
async fn transfer(
    State(_state): State<ApiState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferRequest>, AppError> {
    tracing::info!(
        to_account = request.to_account,
        amount = request.amount,
        "Transfer accepted (not executed)"
    );

    Ok(Json(request))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_request_deserialize() {
        let json = r#"{
            "firstName": "Alice",
            "lastName": "Smith"
        }"#;

        let request: CreateAccountRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.first_name, "Alice");
        assert_eq!(request.last_name, "Smith");
    }

    #[test]
    fn test_transfer_request_deserialize() {
        let json = r#"{
            "toAccount": 498081,
            "amount": 250
        }"#;

        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.to_account, 498081);
        assert_eq!(request.amount, 250);
    }

    #[test]
    fn test_transfer_request_echo_shape() {
        let request = TransferRequest {
            to_account: 167660,
            amount: 100,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["toAccount"], 167660);
        assert_eq!(json["amount"], 100);
    }
}
