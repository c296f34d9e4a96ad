//! Budget split across expense categories.

use rust_decimal::Decimal;
use tripwise_shared::Money;

use crate::expense::ExpenseCategory;

/// Fraction of the plan budget assigned to each category. The split is
/// fixed; see [`CategoryAllocation::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryAllocation {
    fractions: [Decimal; 6],
}

impl Default for CategoryAllocation {
    /// transport 30%, accommodation 35%, food 20%, attraction 10%,
    /// shopping 3%, other 2%.
    fn default() -> Self {
        Self {
            fractions: [
                Decimal::new(30, 2),
                Decimal::new(35, 2),
                Decimal::new(20, 2),
                Decimal::new(10, 2),
                Decimal::new(3, 2),
                Decimal::new(2, 2),
            ],
        }
    }
}

impl CategoryAllocation {
    /// Share for a category.
    #[must_use]
    pub const fn fraction(&self, category: ExpenseCategory) -> Decimal {
        self.fractions[category.index()]
    }

    /// Amount of `budget` allocated to a category, rounded to cents.
    #[must_use]
    pub fn allocate(&self, budget: Money, category: ExpenseCategory) -> Money {
        Money::new(budget.amount() * self.fraction(category))
    }

    /// Sum of every share.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.fractions.iter().sum()
    }
}
