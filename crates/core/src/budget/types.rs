//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripwise_shared::Money;

use crate::expense::{CategoryKey, Expense, ExpenseCategory};

/// One expense as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendRecord {
    /// Category key as stored.
    pub category: CategoryKey,
    /// Amount spent.
    pub amount: Money,
}

impl SpendRecord {
    /// Creates a record for a known category.
    #[must_use]
    pub const fn new(category: ExpenseCategory, amount: Money) -> Self {
        Self {
            category: CategoryKey::Known(category),
            amount,
        }
    }
}

impl From<&Expense> for SpendRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            category: expense.category.clone(),
            amount: expense.amount,
        }
    }
}

/// Budget versus spend for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Category.
    pub category: ExpenseCategory,
    /// Share of the plan budget allocated to this category.
    pub budgeted: Money,
    /// Amount spent.
    pub spent: Money,
    /// `budgeted - spent`, negative when overspent.
    pub remaining: Money,
    /// `spent / budgeted * 100`, zero when nothing was budgeted.
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage: Decimal,
}

/// Result of analysing a plan's expenses against its budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// Plan budget.
    pub total_budget: Money,
    /// Sum of spend across recognized categories.
    pub total_spent: Money,
    /// `total_budget - total_spent`.
    pub remaining: Money,
    /// `total_spent / total_budget * 100`, zero for a zero budget.
    #[serde(with = "rust_decimal::serde::float")]
    pub percentage_used: Decimal,
    /// One entry per category, in report order.
    pub category_breakdown: Vec<CategoryBreakdown>,
}

impl BudgetReport {
    /// Breakdown entry for a category.
    #[must_use]
    pub fn category(&self, category: ExpenseCategory) -> Option<&CategoryBreakdown> {
        self.category_breakdown
            .iter()
            .find(|b| b.category == category)
    }
}
