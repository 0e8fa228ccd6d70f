//! Common test utilities

use std::sync::Arc;

use axum::Router;

use bank_api::api::{create_router, ApiState};
use bank_api::auth::{TokenIssuer, TokenVerifier};
use bank_api::store::MemoryAccountStore;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Build the API router on an in-memory store - no database required.
pub fn test_app() -> Router {
    let store = Arc::new(MemoryAccountStore::new());
    let issuer = TokenIssuer::new(TEST_SECRET, 3600).expect("test issuer");
    let verifier = TokenVerifier::new(TEST_SECRET).expect("test verifier");

    create_router(ApiState::new(store, issuer, verifier))
}
