//! Expense records and their category taxonomy.

pub mod category;
pub mod error;
pub mod summary;
pub mod types;

pub use category::{CategoryKey, ExpenseCategory};
pub use error::ExpenseError;
pub use summary::{CategoryTotal, ExpenseSummary};
pub use types::{DESCRIPTION_MAX_CHARS, Expense, ExpensePatch, NewExpense};

use tripwise_shared::Money;

/// Recomputes a plan's cached total cost from its current expense amounts.
///
/// Runs after every expense create, update or delete. The result does not
/// depend on iteration order.
///
/// # Errors
///
/// Returns `ExpenseError::TotalOutOfRange` when the sum does not fit in a
/// stored amount; the caller must then abandon the mutation.
pub fn recompute_total_cost<I>(amounts: I) -> Result<Money, ExpenseError>
where
    I: IntoIterator<Item = Money>,
{
    Money::checked_sum(amounts)
        .filter(Money::is_storable)
        .ok_or(ExpenseError::TotalOutOfRange)
}
