//! Accounts and password hashing.

mod password;
mod user;

pub use password::{PasswordError, hash_password, needs_rehash, verify_password};
pub use user::{NewUser, User, UserPatch};
