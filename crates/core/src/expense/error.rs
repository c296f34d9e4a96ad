//! Expense error types.

use thiserror::Error;
use tripwise_shared::{AppError, Money};

/// Expense validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    /// Category key outside the closed set.
    #[error("Unknown expense category: {0}")]
    UnknownCategory(String),

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount exceeds the storable range.
    #[error("Amount cannot exceed {}", Money::MAX)]
    AmountTooLarge,

    /// The plan's summed expenses would exceed the storable range.
    #[error("Total cost of the travel plan cannot exceed {}", Money::MAX)]
    TotalOutOfRange,

    /// Description exceeds the length limit.
    #[error("Description must be at most {max} characters, got {actual}")]
    DescriptionTooLong {
        /// Maximum allowed characters.
        max: usize,
        /// Actual character count.
        actual: usize,
    },
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        Self::Validation(err.to_string())
    }
}
