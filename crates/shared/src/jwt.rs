//! Access token issuing and verification.
//!
//! Tokens are HS256, carry the user id as `sub` and are stamped with the
//! `tripwise` issuer. There are no refresh tokens; clients log in again once
//! a token lapses.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;

use crate::auth::Claims;
use crate::config::JwtSettings;
use crate::types::UserId;

/// `iss` claim written into and required on every token.
pub const TOKEN_ISSUER: &str = "tripwise";

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 1800,
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_secs: i64::try_from(settings.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Token errors.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// Past `exp` (plus leeway).
    #[error("token has expired")]
    Expired,

    /// Bad signature, wrong issuer, missing claims or not a JWT at all.
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Issues and verifies access tokens.
#[derive(Clone)]
pub struct JwtService {
    lifetime_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("lifetime_secs", &self.lifetime_secs)
            .field("secret", &"[hidden]")
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds the service from its configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            lifetime_secs: config.access_token_expires_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Signs a token for `user_id` valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Signing` if encoding fails.
    pub fn generate_access_token(&self, user_id: UserId) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, Utc::now() + Duration::seconds(self.lifetime_secs));
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` for lapsed tokens, `JwtError::Invalid` otherwise.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Token lifetime reported to clients as `expires_in`.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.lifetime_secs
    }
}

#[cfg(test)]
#[path = "jwt_tests.rs"]
mod tests;
