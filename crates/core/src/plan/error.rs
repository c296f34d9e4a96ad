//! Plan error types.

use chrono::NaiveDate;
use thiserror::Error;
use tripwise_shared::{AppError, Money};

/// Plan validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// A text field is empty or too long.
    #[error("{field} must be between 1 and {max} characters")]
    TextLength {
        /// Field name.
        field: &'static str,
        /// Maximum allowed characters.
        max: usize,
    },

    /// End date precedes start date.
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Budget cannot be negative.
    #[error("Budget cannot be negative")]
    NegativeBudget,

    /// Budget exceeds the storable range.
    #[error("Budget cannot exceed {}", Money::MAX)]
    BudgetTooLarge,

    /// At least one traveller is required.
    #[error("People count must be at least 1, got {0}")]
    InvalidPeopleCount(i32),

    /// Unknown status value.
    #[error("Unknown plan status: {0}")]
    UnknownStatus(String),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        Self::Validation(err.to_string())
    }
}
