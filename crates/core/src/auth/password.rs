//! Argon2id password hashing.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`), so the parameters used
//! for a given account travel with its hash and can be upgraded on login.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing errors.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Verification failed for a reason other than a mismatch.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// The stored value is not a PHC hash.
    #[error("invalid password hash format")]
    InvalidHash,
}

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hashes a password with a fresh random salt.
///
/// ```
/// use tripwise_core::auth::hash_password;
///
/// let hash = hash_password("s3cret-trip").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks a password against a stored hash. A mismatch is `Ok(false)`.
///
/// # Errors
///
/// `PasswordError::InvalidHash` when `hash` cannot be parsed,
/// `PasswordError::VerifyError` for any other failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters are read from the hash itself, so older hashes still verify.
    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Whether a stored hash was made with something other than the current
/// algorithm, version or cost parameters.
///
/// Unparseable hashes count as needing a rehash.
pub fn needs_rehash(hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return true;
    };
    if parsed.algorithm != Algorithm::Argon2id.ident()
        || parsed.version != Some(Version::V0x13.into())
    {
        return true;
    }

    let current = Params::default();
    Params::try_from(&parsed).map_or(true, |params| {
        params.m_cost() != current.m_cost()
            || params.t_cost() != current.t_cost()
            || params.p_cost() != current.p_cost()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("chengdu-2025").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(verify_password("chengdu-2025", &hash).unwrap());
        assert!(!verify_password("chengdu-2024", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("same").unwrap(),
            hash_password("same").unwrap()
        );
    }

    #[test]
    fn test_unicode_password() {
        let hash = hash_password("旅行密码123").unwrap();
        assert!(verify_password("旅行密码123", &hash).unwrap());
        assert!(!verify_password("旅行密码124", &hash).unwrap());
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            verify_password("password", "plaintext"),
            Err(PasswordError::InvalidHash)
        ));
    }

    #[test]
    fn test_fresh_hash_is_current() {
        assert!(!needs_rehash(&hash_password("pw").unwrap()));
    }

    #[test]
    fn test_weaker_params_need_rehash() {
        let weak = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(1024, 1, 1, None).unwrap(),
        );
        let salt = SaltString::generate(&mut OsRng);
        let hash = weak
            .hash_password(b"pw", &salt)
            .unwrap()
            .to_string();

        assert!(verify_password("pw", &hash).unwrap());
        assert!(needs_rehash(&hash));
        assert!(needs_rehash("not-a-hash"));
    }
}
