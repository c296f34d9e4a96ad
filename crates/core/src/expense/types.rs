//! Expense data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tripwise_shared::{ExpenseId, Money, TravelPlanId};

use super::category::{CategoryKey, ExpenseCategory};
use super::error::ExpenseError;

/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// A stored expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning travel plan.
    pub travel_plan_id: TravelPlanId,
    /// Category key as stored.
    pub category: CategoryKey,
    /// Amount spent.
    pub amount: Money,
    /// Optional free-text description.
    pub description: Option<String>,
    /// When the expense occurred.
    pub expense_date: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a new expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// Plan the expense belongs to.
    pub travel_plan_id: TravelPlanId,
    /// Category.
    pub category: ExpenseCategory,
    /// Amount spent.
    pub amount: Money,
    /// Optional description.
    pub description: Option<String>,
    /// When the expense occurred.
    pub expense_date: DateTime<Utc>,
}

impl NewExpense {
    /// Validates amount and description.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NegativeAmount`, `ExpenseError::AmountTooLarge` or
    /// `ExpenseError::DescriptionTooLong`.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        validate_amount(self.amount)?;
        validate_description(self.description.as_deref())
    }

    /// Builds the stored record.
    #[must_use]
    pub fn into_expense(self, id: ExpenseId, now: DateTime<Utc>) -> Expense {
        Expense {
            id,
            travel_plan_id: self.travel_plan_id,
            category: self.category.into(),
            amount: self.amount,
            description: self.description,
            expense_date: self.expense_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of an expense. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    /// Move the expense to another plan owned by the same user.
    pub travel_plan_id: Option<TravelPlanId>,
    /// New category.
    pub category: Option<ExpenseCategory>,
    /// New amount.
    pub amount: Option<Money>,
    /// New description.
    pub description: Option<String>,
    /// New occurrence date.
    pub expense_date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// Validates the fields being changed.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NegativeAmount`, `ExpenseError::AmountTooLarge` or
    /// `ExpenseError::DescriptionTooLong`.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        validate_description(self.description.as_deref())
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, expense: &mut Expense, now: DateTime<Utc>) {
        if let Some(plan_id) = self.travel_plan_id {
            expense.travel_plan_id = plan_id;
        }
        if let Some(category) = self.category {
            expense.category = category.into();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(description) = &self.description {
            expense.description = Some(description.clone());
        }
        if let Some(date) = self.expense_date {
            expense.expense_date = date;
        }
        expense.updated_at = now;
    }
}

fn validate_amount(amount: Money) -> Result<(), ExpenseError> {
    if amount.is_negative() {
        return Err(ExpenseError::NegativeAmount);
    }
    if !amount.is_storable() {
        return Err(ExpenseError::AmountTooLarge);
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ExpenseError> {
    let actual = description.map_or(0, |d| d.chars().count());
    if actual > DESCRIPTION_MAX_CHARS {
        return Err(ExpenseError::DescriptionTooLong {
            max: DESCRIPTION_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn new_expense() -> NewExpense {
        NewExpense {
            travel_plan_id: TravelPlanId::new(1),
            category: ExpenseCategory::Food,
            amount: Money::new(dec!(35.50)),
            description: Some("noodles".into()),
            expense_date: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_new_expense_validates() {
        assert!(new_expense().validate().is_ok());

        let zero = NewExpense {
            amount: Money::ZERO,
            ..new_expense()
        };
        assert!(zero.validate().is_ok());

        let negative = NewExpense {
            amount: Money::new(dec!(-1)),
            ..new_expense()
        };
        assert_eq!(negative.validate(), Err(ExpenseError::NegativeAmount));

        let at_max = NewExpense {
            amount: Money::MAX,
            ..new_expense()
        };
        assert!(at_max.validate().is_ok());

        let too_large = NewExpense {
            amount: Money::new(dec!(10000000000)),
            ..new_expense()
        };
        assert_eq!(too_large.validate(), Err(ExpenseError::AmountTooLarge));
    }

    #[test]
    fn test_description_limit_counts_chars() {
        let at_limit = NewExpense {
            description: Some("餐".repeat(DESCRIPTION_MAX_CHARS)),
            ..new_expense()
        };
        assert!(at_limit.validate().is_ok());

        let over = NewExpense {
            description: Some("a".repeat(DESCRIPTION_MAX_CHARS + 1)),
            ..new_expense()
        };
        assert_eq!(
            over.validate(),
            Err(ExpenseError::DescriptionTooLong {
                max: 500,
                actual: 501
            })
        );
    }

    #[test]
    fn test_patch_applies_only_set_fields() {
        let created = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap();
        let mut expense = new_expense().into_expense(ExpenseId::new(5), created);

        let patch = ExpensePatch {
            amount: Some(Money::new(dec!(40))),
            category: Some(ExpenseCategory::Shopping),
            ..ExpensePatch::default()
        };
        assert!(patch.validate().is_ok());
        patch.apply_to(&mut expense, later);

        assert_eq!(expense.amount.amount(), dec!(40.00));
        assert_eq!(expense.category, CategoryKey::Known(ExpenseCategory::Shopping));
        assert_eq!(expense.description.as_deref(), Some("noodles"));
        assert_eq!(expense.travel_plan_id, TravelPlanId::new(1));
        assert_eq!(expense.created_at, created);
        assert_eq!(expense.updated_at, later);
    }

    #[test]
    fn test_patch_rejects_negative_amount() {
        let patch = ExpensePatch {
            amount: Some(Money::new(dec!(-0.01))),
            ..ExpensePatch::default()
        };
        assert_eq!(patch.validate(), Err(ExpenseError::NegativeAmount));
    }
}
