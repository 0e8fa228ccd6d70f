//! Authentication module
//!
//! Access token issuance and verification.

mod token;

pub use token::{AuthError, Claims, TokenIssuer, TokenVerifier, TOKEN_HEADER};
