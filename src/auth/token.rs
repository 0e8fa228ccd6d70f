//! Access token issuance and verification.
//!
//! Tokens are compact HS256 JWTs carrying two claims: `accountNumber`
//! (the account the bearer may act as) and `expiresAt` (unix seconds).
//! The claim key names are part of the wire contract and must not change,
//! which is why expiry lives in `expiresAt` rather than the registered
//! `exp` claim and is checked here instead of by the JWT library.

use chrono::Utc;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::domain::Account;

/// Request header carrying the access token.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Signing algorithms accepted during verification. Only the HMAC family;
/// a token declaring anything else is rejected before the secret is used.
const ACCEPTED_ALGORITHMS: &[Algorithm] =
    &[Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Token claims, decoded once during verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account number the bearer is authorized to act as.
    #[serde(rename = "accountNumber")]
    pub account_number: i64,

    /// Expiry instant, unix seconds.
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Signing secret is empty. Refused at construction time so the
    /// process can never sign or accept tokens with an empty key.
    #[error("Signing secret must not be empty")]
    EmptySecret,

    /// Malformed token - cannot be decoded.
    #[error("Invalid token format: {0}")]
    InvalidTokenFormat(String),

    /// Signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Declared algorithm is not in the accepted HMAC family.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token is past its `expiresAt` claim.
    #[error("Token expired")]
    TokenExpired,

    /// Signing failed while issuing a token.
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                AuthError::UnsupportedAlgorithm("algorithm not accepted".into())
            }
            _ => AuthError::InvalidTokenFormat(format!("JWT error: {}", err)),
        }
    }
}

/// Issues signed access tokens for accounts.
///
/// Holds the signing key and token lifetime as immutable process
/// configuration, injected once at startup.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_seconds: i64,
}

impl TokenIssuer {
    /// Create an issuer from the process secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmptySecret`] if the secret is empty.
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        })
    }

    /// Issue a token scoped to the given account's number.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Signing`] if encoding fails; callers must not
    /// persist an account whose token could not be issued.
    pub fn issue(&self, account: &Account) -> Result<String, AuthError> {
        let claims = Claims {
            account_number: account.number,
            expires_at: Utc::now().timestamp() + self.ttl_seconds,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }
}

/// Verifies presented access tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier from the process secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmptySecret`] if the secret is empty.
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        // Claims carry expiry in `expiresAt`, not the registered `exp`;
        // expiry is enforced manually in `verify`.
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Verify a presented token and return its claims.
    ///
    /// Checks, in order: the declared algorithm is in the HMAC family,
    /// the signature verifies against the process secret, and the token
    /// is not past its `expiresAt` claim. Pure computation; verifying the
    /// same token twice yields the same claims.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as an [`AuthError`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        if !ACCEPTED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::UnsupportedAlgorithm(format!("{:?}", header.alg)));
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = token_data.claims;

        if claims.expires_at <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
