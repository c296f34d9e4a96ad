//! Core business logic for Tripwise.
//!
//! Pure domain code with no web or database dependencies. Persistence and
//! outside services are reached through the traits in [`store`],
//! [`itinerary`] and [`voice`].
//!
//! # Modules
//!
//! - `auth` - Accounts and password hashing
//! - `plan` - Travel plans and their validation
//! - `expense` - Expense records, categories and summaries
//! - `budget` - Category allocation and budget reports
//! - `itinerary` - Itinerary prompts, parsing and the template planner
//! - `voice` - Speech recognition seam and intent extraction
//! - `store` - Owner-scoped persistence traits

pub mod auth;
pub mod budget;
pub mod expense;
pub mod itinerary;
pub mod plan;
pub mod store;
pub mod voice;
