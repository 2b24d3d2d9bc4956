/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Signed session-cookie JWT generation and validation.
//!
//! The session cookie never carries the Figshare token itself, only a random
//! session id. The token lives server-side behind
//! [`crate::storage::TokenStorage`].

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Name of the session cookie set after a successful login.
pub const SESSION_COOKIE: &str = "session";

/// Issuer claim stamped into every session JWT.
pub const ISSUER: &str = "figshare-login";

/// Claims carried by the session cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Opaque session id used as the token-storage key.
    pub sid: String,
    pub iss: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Sign a session JWT for the given session id.
pub fn generate_session_token(
    secret: &str,
    session_id: &str,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let claims = SessionClaims {
        sid: session_id.to_string(),
        iss: ISSUER.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign session JWT: {e}");
        AppError::internal("failed to generate session token")
    })
}

/// Validate a session JWT and return the session id it carries.
///
/// An invalid, tampered, or expired token yields `None`: the request simply
/// has no session, it is not an error.
pub fn validate_session_token(secret: &str, token: &str) -> Option<String> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.sid)
}
