//! Bearer token issue/verify for the task API.
//!
//! Tokens are HS256 JWTs carrying the user id in `sub`. Verification
//! enforces expiry; everything else about a bad token collapses into one
//! error because callers treat all failures as "not authenticated".

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token: {0}")]
    Verify(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id the token was issued to.
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue_token(secret: &str, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)
}

pub fn verify_token(secret: &str, token: &str) -> Result<TokenClaims, TokenError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::Verify)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn roundtrip_preserves_subject() {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, Duration::days(30)).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::days(1)).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default validation leeway.
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::hours(-2)).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(SECRET, Uuid::new_v4(), Duration::days(1)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(verify_token(SECRET, &tampered).is_err());
    }
}
