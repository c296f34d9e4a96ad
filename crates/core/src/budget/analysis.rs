//! Budget analysis engine.

use rust_decimal::Decimal;
use tracing::warn;
use tripwise_shared::Money;
use tripwise_shared::types::money::round_half_up;

use super::allocation::CategoryAllocation;
use super::types::{BudgetReport, CategoryBreakdown, SpendRecord};
use crate::expense::{Expense, ExpenseCategory};

/// Compares a plan's spend with its per-category allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetAnalyzer {
    allocation: CategoryAllocation,
}

impl BudgetAnalyzer {
    /// Builds the budget report.
    ///
    /// Records whose category is not recognized are left out of the
    /// breakdown and of `total_spent`. A budget of zero or less yields zero
    /// percentages.
    #[must_use]
    pub fn analyze(&self, budget: Money, records: &[SpendRecord]) -> BudgetReport {
        let mut spent = [Money::ZERO; 6];
        for record in records {
            match record.category.known() {
                Some(category) => spent[category.index()] += record.amount,
                None => warn!(
                    category = %record.category,
                    amount = %record.amount,
                    "Skipping expense with unrecognized category"
                ),
            }
        }

        let category_breakdown: Vec<CategoryBreakdown> = ExpenseCategory::ALL
            .into_iter()
            .map(|category| {
                let budgeted = self.allocation.allocate(budget, category);
                let spent = spent[category.index()];
                CategoryBreakdown {
                    category,
                    budgeted,
                    spent,
                    remaining: budgeted - spent,
                    percentage: percent_of(spent, budgeted),
                }
            })
            .collect();

        let total_spent: Money = category_breakdown.iter().map(|b| b.spent).sum();

        BudgetReport {
            total_budget: budget,
            total_spent,
            remaining: budget - total_spent,
            percentage_used: percent_of(total_spent, budget),
            category_breakdown,
        }
    }

    /// Convenience wrapper over [`Self::analyze`] for stored expenses.
    #[must_use]
    pub fn analyze_expenses(&self, budget: Money, expenses: &[Expense]) -> BudgetReport {
        let records: Vec<SpendRecord> = expenses.iter().map(SpendRecord::from).collect();
        self.analyze(budget, &records)
    }
}

/// `part / whole * 100` to two places; zero unless `whole` is positive.
fn percent_of(part: Money, whole: Money) -> Decimal {
    if !whole.is_positive() {
        return round_half_up(Decimal::ZERO, 2);
    }
    round_half_up(
        part.amount() / whole.amount() * Decimal::ONE_HUNDRED,
        2,
    )
}
