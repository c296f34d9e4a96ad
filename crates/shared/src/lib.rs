//! Shared types, errors, and configuration for Tripwise.
//!
//! This crate provides common types used across all other crates:
//! - Money type with exact two-digit decimal precision
//! - Typed IDs for type-safe entity references
//! - Lenient date parsing for request payloads
//! - Application-wide error types
//! - Configuration management
//! - JWT issuing and validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::{ExpenseId, Money, TravelPlanId, UserId};
