//! Authentication extractors and token handling.
//!
//! This module provides:
//! - `TokenIssuer` - HS256 bearer token signing and verification
//! - `AuthUser` - any logged-in member, loaded from the store
//! - `CoachUser` - a logged-in member holding the `COACH` role

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use coursebook_core::{User, UserId};

use crate::error::ApiError;
use crate::state::AppState;

const PLEASE_LOG_IN: &str = "please log in";
const TOKEN_EXPIRED: &str = "token expired";
const INVALID_TOKEN: &str = "invalid token";

/// Longest accepted token lifetime in days.
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 3650;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration time (unix seconds).
    pub exp: i64,
}

/// Signs and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer for the given secret and lifetime in days.
    ///
    /// The lifetime is clamped to `1..=MAX_TOKEN_LIFETIME_DAYS`.
    #[must_use]
    pub fn new(secret: &str, expires_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::days(expires_days.clamp(1, MAX_TOKEN_LIFETIME_DAYS)),
        }
    }

    /// Issue a token for a user, valid from now.
    pub fn issue(&self, user_id: &UserId) -> Result<String, ApiError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user_id: &UserId, issued_at: DateTime<Utc>) -> Result<String, ApiError> {
        let expires_at = issued_at
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| ApiError::Internal("token expiry out of range".into()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify a token and return the user it was issued to.
    pub fn verify(&self, token: &str) -> Result<UserId, ApiError> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::Unauthorized(TOKEN_EXPIRED),
                _ => ApiError::Unauthorized(INVALID_TOKEN),
            }
        })?;

        data.claims
            .sub
            .parse::<UserId>()
            .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN))
    }
}

/// Hash a password with bcrypt off the async executor.
pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
}

/// Check a password against a bcrypt hash off the async executor.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| ApiError::Internal(format!("failed to verify password: {e}")))
}

/// A member authenticated by bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The member's current record.
    pub user: User,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized(PLEASE_LOG_IN))?;

        let user_id = state.tokens.verify(token.trim())?;

        let user = state
            .store
            .get_user(&user_id)?
            .ok_or(ApiError::Unauthorized(INVALID_TOKEN))?;

        Ok(Self { user })
    }
}

/// A member authenticated by bearer token who holds the `COACH` role.
#[derive(Debug, Clone)]
pub struct CoachUser {
    /// The coach's user record.
    pub user: User,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CoachUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { user } = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_coach() {
            tracing::debug!(user_id = %user.id, "Coach role required");
            return Err(ApiError::Forbidden("coach role required"));
        }

        Ok(Self { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let issuer = TokenIssuer::new("secret", 30);
        let user_id = UserId::generate();
        let token = issuer.issue(&user_id).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let issuer = TokenIssuer::new("secret", 1);
        let user_id = UserId::generate();
        let token = issuer
            .issue_at(&user_id, Utc::now() - Duration::days(3))
            .unwrap();

        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(TOKEN_EXPIRED)));
    }

    #[test]
    fn foreign_signature_is_invalid() {
        let ours = TokenIssuer::new("secret", 30);
        let theirs = TokenIssuer::new("other-secret", 30);
        let token = theirs.issue(&UserId::generate()).unwrap();

        let err = ours.verify(&token).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(INVALID_TOKEN)));
    }

    #[test]
    fn garbage_is_invalid() {
        let issuer = TokenIssuer::new("secret", 30);
        let err = issuer.verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(INVALID_TOKEN)));
    }

    #[test]
    fn extreme_lifetimes_are_clamped() {
        let user_id = UserId::generate();

        let forever = TokenIssuer::new("secret", i64::MAX);
        assert_eq!(forever.lifetime, Duration::days(MAX_TOKEN_LIFETIME_DAYS));
        assert_eq!(forever.verify(&forever.issue(&user_id).unwrap()).unwrap(), user_id);

        let never = TokenIssuer::new("secret", i64::MIN);
        assert_eq!(never.lifetime, Duration::days(1));
    }

    #[test]
    fn expiry_past_the_calendar_is_an_error() {
        let issuer = TokenIssuer::new("secret", 30);
        let err = issuer
            .issue_at(&UserId::generate(), DateTime::<Utc>::MAX_UTC)
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn password_hash_round_trip() {
        let hash = hash_password("Passw0rd".into(), 4).await.unwrap();
        assert!(verify_password("Passw0rd".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong".into(), hash).await.unwrap());
    }
}
