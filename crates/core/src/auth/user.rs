//! User accounts.

use chrono::{DateTime, Utc};
use tripwise_shared::auth::UserInfo;
use tripwise_shared::UserId;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Unique email.
    pub email: String,
    /// Unique username.
    pub username: String,
    /// Argon2 PHC hash.
    pub hashed_password: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view without the password hash.
    #[must_use]
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }
}

/// Input for creating an account. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Email, stored lowercased.
    pub email: String,
    /// Username.
    pub username: String,
    /// Argon2 PHC hash.
    pub hashed_password: String,
    /// Phone number.
    pub phone: Option<String>,
}

impl NewUser {
    /// Builds the stored account.
    #[must_use]
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            hashed_password: self.hashed_password,
            phone: self.phone,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile or credential changes. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New username; must stay unique.
    pub username: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// New Argon2 PHC hash.
    pub hashed_password: Option<String>,
}

impl UserPatch {
    /// True when nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.phone.is_none()
            && self.avatar.is_none()
            && self.hashed_password.is_none()
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(username) = &self.username {
            user.username.clone_from(username);
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(hash) = &self.hashed_password {
            user.hashed_password.clone_from(hash);
        }
        user.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_hides_hash() {
        let user = NewUser {
            email: "a@example.com".into(),
            username: "alice".into(),
            hashed_password: "$argon2id$...".into(),
            phone: None,
        }
        .into_user(UserId::new(1), Utc::now());

        let json = serde_json::to_value(user.info()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "alice");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn test_patch_applies_only_given_fields() {
        let mut user = NewUser {
            email: "a@example.com".into(),
            username: "alice".into(),
            hashed_password: "old".into(),
            phone: Some("123".into()),
        }
        .into_user(UserId::new(1), Utc::now());

        let patch = UserPatch {
            avatar: Some("https://img.example.com/a.png".into()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
        assert!(UserPatch::default().is_empty());

        patch.apply_to(&mut user, Utc::now());

        assert_eq!(user.username, "alice");
        assert_eq!(user.phone.as_deref(), Some("123"));
        assert_eq!(user.avatar.as_deref(), Some("https://img.example.com/a.png"));
        assert_eq!(user.hashed_password, "old");
    }
}
