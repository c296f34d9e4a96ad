//! Authentication types for JWT and login flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::UserId;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Issuer, always `tripwise`.
    pub iss: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: UserId, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            iss: crate::jwt::TOKEN_ISSUER.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Display username.
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub username: String,
    /// User password.
    #[validate(length(min = 6, max = 128, message = "must be 6-128 characters"))]
    pub password: String,
    /// Optional phone number.
    #[serde(default)]
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub phone: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: &'static str,
    /// Token expiration in seconds.
    pub expires_in: i64,
    /// Authenticated user info.
    pub user: UserInfo,
}

impl LoginResponse {
    /// Creates a bearer token response.
    #[must_use]
    pub const fn bearer(access_token: String, expires_in: i64, user: UserInfo) -> Self {
        Self {
            access_token,
            token_type: "bearer",
            expires_in,
            user,
        }
    }
}

/// User info returned in auth responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: UserId,
    /// User email.
    pub email: String,
    /// Username.
    pub username: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Account creation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("a@example.com", "alice", "secret1").validate().is_ok());

        let errors = register("not-an-email", "", "123").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_claims_carry_user() {
        let claims = Claims::new(UserId::new(9), Utc::now());
        assert_eq!(claims.user_id(), UserId::new(9));
        assert!(claims.exp >= claims.iat - 1);
    }
}
