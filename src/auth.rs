// ABOUTME: JWT bearer token validation producing a per-request authenticated identity
// ABOUTME: Verifies tokens at the HTTP boundary; core calls receive an explicit user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack

//! # Authentication Boundary
//!
//! Validates an externally-issued JWT on every request and hands the verified
//! `user_id` explicitly to each store/aggregator call. No credential is
//! captured at startup and reused; identity is per-request by design.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authentication result with the verified user identity
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
}

/// Validates bearer tokens for the HTTP layer
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from a shared secret
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    /// Issue a token for a user (used by tooling and tests; token issuance
    /// for real users lives in the external auth service)
    ///
    /// # Errors
    ///
    /// Returns an error if token signing fails.
    pub fn generate_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.expiry_hours);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {e}")))
    }

    /// Validate a raw token and extract the user id
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` if the signature is invalid, the token has
    /// expired, or the subject is not a valid `UUID`.
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Token subject is not a valid user id"))?;

        Ok(AuthResult { user_id })
    }

    /// Authenticate a request from its `authorization` header value
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when the header is absent and `AuthInvalid`
    /// when it is malformed or fails validation.
    pub fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let header = auth_header.ok_or_else(AppError::auth_required)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;
        self.validate_token(token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn manager() -> AuthManager {
        AuthManager::new(b"test-secret", 24)
    }

    #[test]
    fn test_token_round_trip() {
        let auth = manager();
        let user_id = Uuid::new_v4();
        let token = auth.generate_token(user_id).unwrap();

        let result = auth
            .authenticate_request(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(result.user_id, user_id);
    }

    #[test]
    fn test_missing_header_is_auth_required() {
        let err = manager().authenticate_request(None).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::AuthRequired);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager().generate_token(Uuid::new_v4()).unwrap();
        let other = AuthManager::new(b"different-secret", 24);
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_non_bearer_header_rejected() {
        let err = manager()
            .authenticate_request(Some("Basic dXNlcjpwdw=="))
            .unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::AuthInvalid);
    }
}
