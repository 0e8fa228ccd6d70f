//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::store::AccountStore;

pub use routes::create_router;

/// Shared request state: the account store plus the token issuer and
/// verifier, all built once at startup.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn AccountStore>,
    pub issuer: TokenIssuer,
    pub verifier: TokenVerifier,
}

impl ApiState {
    pub fn new(store: Arc<dyn AccountStore>, issuer: TokenIssuer, verifier: TokenVerifier) -> Self {
        Self {
            store,
            issuer,
            verifier,
        }
    }
}
