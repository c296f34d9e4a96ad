//! Row to domain conversions.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::Set;
use tracing::warn;
use tripwise_core::auth::User;
use tripwise_core::expense::{CategoryKey, Expense};
use tripwise_core::itinerary::DayItinerary;
use tripwise_core::plan::{PlanStatus, TravelPlan};
use tripwise_core::store::StoreError;
use tripwise_shared::{ExpenseId, Money, TravelPlanId, UserId};

use crate::entities::{expenses, travel_plans, users};

type DateTimeWithOffset = DateTime<FixedOffset>;

pub(crate) fn to_utc(at: DateTimeWithOffset) -> DateTime<Utc> {
    at.with_timezone(&Utc)
}

pub(crate) fn to_db_time(at: DateTime<Utc>) -> DateTimeWithOffset {
    at.fixed_offset()
}

impl From<users::Model> for User {
    fn from(row: users::Model) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            username: row.username,
            hashed_password: row.hashed_password,
            phone: row.phone,
            avatar: row.avatar,
            created_at: to_utc(row.created_at),
            updated_at: to_utc(row.updated_at),
        }
    }
}

impl From<expenses::Model> for Expense {
    fn from(row: expenses::Model) -> Self {
        Self {
            id: ExpenseId::new(row.id),
            travel_plan_id: TravelPlanId::new(row.travel_plan_id),
            category: CategoryKey::parse(&row.category),
            amount: Money::new(row.amount),
            description: row.description,
            expense_date: to_utc(row.expense_date),
            created_at: to_utc(row.created_at),
            updated_at: to_utc(row.updated_at),
        }
    }
}

/// Converts a plan row. JSON columns that fail to decode are logged and
/// read as empty.
pub(crate) fn plan_from_row(row: travel_plans::Model) -> Result<TravelPlan, StoreError> {
    let status: PlanStatus = row
        .status
        .parse()
        .map_err(|e| StoreError::Backend(format!("travel plan {}: {e}", row.id)))?;

    let preferences = serde_json::from_value::<Vec<String>>(row.preferences).unwrap_or_else(|e| {
        warn!(plan_id = row.id, error = %e, "Unreadable preferences column");
        Vec::new()
    });

    let itinerary = row.itinerary.and_then(|value| {
        serde_json::from_value::<Vec<DayItinerary>>(value)
            .inspect_err(|e| warn!(plan_id = row.id, error = %e, "Unreadable itinerary column"))
            .ok()
    });

    Ok(TravelPlan {
        id: TravelPlanId::new(row.id),
        user_id: UserId::new(row.user_id),
        title: row.title,
        destination: row.destination,
        start_date: row.start_date,
        end_date: row.end_date,
        budget: Money::new(row.budget),
        people_count: row.people_count,
        preferences,
        itinerary,
        total_cost: Money::new(row.total_cost),
        status,
        created_at: to_utc(row.created_at),
        updated_at: to_utc(row.updated_at),
    })
}

/// Full-row active model for a plan. `id` is left unset when zero so
/// inserts take the next sequence value.
pub(crate) fn plan_to_active(plan: &TravelPlan) -> Result<travel_plans::ActiveModel, StoreError> {
    let preferences = serde_json::to_value(&plan.preferences)
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    let itinerary = plan
        .itinerary
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| StoreError::Backend(e.to_string()))?;

    let mut active = travel_plans::ActiveModel {
        user_id: Set(plan.user_id.into_inner()),
        title: Set(plan.title.clone()),
        destination: Set(plan.destination.clone()),
        start_date: Set(plan.start_date),
        end_date: Set(plan.end_date),
        budget: Set(plan.budget.amount()),
        people_count: Set(plan.people_count),
        preferences: Set(preferences),
        itinerary: Set(itinerary),
        total_cost: Set(plan.total_cost.amount()),
        status: Set(plan.status.as_str().to_string()),
        created_at: Set(to_db_time(plan.created_at)),
        updated_at: Set(to_db_time(plan.updated_at)),
        ..Default::default()
    };
    if plan.id.into_inner() != 0 {
        active.id = Set(plan.id.into_inner());
    }
    Ok(active)
}

/// Full-row active model for an expense, same `id` rule as plans.
pub(crate) fn expense_to_active(expense: &Expense) -> expenses::ActiveModel {
    let mut active = expenses::ActiveModel {
        travel_plan_id: Set(expense.travel_plan_id.into_inner()),
        category: Set(expense.category.as_str().to_string()),
        amount: Set(expense.amount.amount()),
        description: Set(expense.description.clone()),
        expense_date: Set(to_db_time(expense.expense_date)),
        created_at: Set(to_db_time(expense.created_at)),
        updated_at: Set(to_db_time(expense.updated_at)),
        ..Default::default()
    };
    if expense.id.into_inner() != 0 {
        active.id = Set(expense.id.into_inner());
    }
    active
}
