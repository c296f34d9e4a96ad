//! Per-user expense overview.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripwise_shared::Money;

use super::category::{CategoryKey, ExpenseCategory};
use super::types::Expense;

/// Count and total for one category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category key as stored.
    pub category: CategoryKey,
    /// Number of records.
    pub count: u64,
    /// Summed amount.
    pub total: Money,
}

/// Overview of every expense a user has recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// Number of expense records.
    pub total_records: u64,
    /// Sum of all amounts.
    pub total_amount: Money,
    /// Mean amount, zero without records.
    pub average_amount: Money,
    /// Number of travel plans the user owns.
    pub travel_plan_count: u64,
    /// Categories with at least one record; known categories first, in report order.
    pub category_breakdown: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    /// Aggregates a user's expenses.
    #[must_use]
    pub fn from_expenses(expenses: &[Expense], travel_plan_count: u64) -> Self {
        let mut known: [(u64, Money); 6] = [(0, Money::ZERO); 6];
        let mut legacy: BTreeMap<String, (u64, Money)> = BTreeMap::new();

        for expense in expenses {
            let slot = match &expense.category {
                CategoryKey::Known(c) => &mut known[c.index()],
                CategoryKey::Unrecognized(raw) => legacy.entry(raw.clone()).or_default(),
            };
            slot.0 += 1;
            slot.1 += expense.amount;
        }

        let total_records = expenses.len() as u64;
        let total_amount: Money = expenses.iter().map(|e| e.amount).sum();
        let average_amount = if total_records == 0 {
            Money::ZERO
        } else {
            Money::new(total_amount.amount() / Decimal::from(total_records))
        };

        let category_breakdown = ExpenseCategory::ALL
            .into_iter()
            .map(CategoryKey::Known)
            .zip(known)
            .chain(
                legacy
                    .into_iter()
                    .map(|(raw, slot)| (CategoryKey::Unrecognized(raw), slot)),
            )
            .filter(|(_, (count, _))| *count > 0)
            .map(|(category, (count, total))| CategoryTotal {
                category,
                count,
                total,
            })
            .collect();

        Self {
            total_records,
            total_amount,
            average_amount,
            travel_plan_count,
            category_breakdown,
        }
    }
}
