//! Persistence seams.
//!
//! Handlers talk to storage only through these traits. Every lookup is
//! scoped by owner: a plan or expense that exists but belongs to someone
//! else is reported exactly like a missing one.

#[cfg(feature = "memory-store")]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tripwise_shared::{AppError, ExpenseId, TravelPlanId, UserId};

use crate::auth::{NewUser, User, UserPatch};
use crate::expense::{Expense, ExpenseCategory, ExpenseError, ExpensePatch, NewExpense};
use crate::plan::{NewTravelPlan, PlanStatus, TravelPlan, TravelPlanPatch};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The write would break a data invariant, such as a plan total that no
    /// longer fits in a stored amount. Nothing was changed.
    #[error("invalid: {0}")]
    Invalid(String),

    /// The backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<ExpenseError> for StoreError {
    fn from(err: ExpenseError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(what),
            StoreError::Conflict(what) => Self::Conflict(what),
            StoreError::Invalid(why) => Self::Validation(why),
            StoreError::Backend(detail) => Self::Database(detail),
        }
    }
}

/// Account storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts an account; `Conflict` if the email or username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Looks up an account by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Looks up an account by username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Looks up an account by id.
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Applies a patch; `Conflict` if the new username is taken by someone
    /// else, `None` if the account is gone.
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, StoreError>;
}

/// Travel plan storage.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Inserts a plan with a zero total cost.
    async fn create_plan(&self, owner: UserId, plan: NewTravelPlan)
    -> Result<TravelPlan, StoreError>;

    /// Fetches an owned plan.
    async fn find_plan(
        &self,
        owner: UserId,
        id: TravelPlanId,
    ) -> Result<Option<TravelPlan>, StoreError>;

    /// Owned plans, newest first, optionally filtered by status.
    async fn list_plans(
        &self,
        owner: UserId,
        status: Option<PlanStatus>,
    ) -> Result<Vec<TravelPlan>, StoreError>;

    /// Applies a validated patch to an owned plan.
    async fn update_plan(
        &self,
        owner: UserId,
        id: TravelPlanId,
        patch: TravelPlanPatch,
    ) -> Result<Option<TravelPlan>, StoreError>;

    /// Deletes an owned plan and its expenses. `false` if nothing was deleted.
    async fn delete_plan(&self, owner: UserId, id: TravelPlanId) -> Result<bool, StoreError>;

    /// Number of plans the user owns.
    async fn count_plans(&self, owner: UserId) -> Result<u64, StoreError>;
}

/// Expense storage.
///
/// Every mutation recomputes the affected plans' `total_cost` in the same
/// unit of work.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Records an expense; `None` if the plan is missing or not owned.
    async fn create_expense(
        &self,
        owner: UserId,
        expense: NewExpense,
    ) -> Result<Option<Expense>, StoreError>;

    /// Fetches an expense on one of the owner's plans.
    async fn find_expense(&self, owner: UserId, id: ExpenseId)
    -> Result<Option<Expense>, StoreError>;

    /// A plan's expenses, newest `expense_date` first; `None` if the plan is
    /// missing or not owned.
    async fn list_plan_expenses(
        &self,
        owner: UserId,
        plan: TravelPlanId,
        category: Option<ExpenseCategory>,
    ) -> Result<Option<Vec<Expense>>, StoreError>;

    /// Every expense across the owner's plans.
    async fn list_user_expenses(&self, owner: UserId) -> Result<Vec<Expense>, StoreError>;

    /// Applies a validated patch. Moving to a plan the owner does not have
    /// yields `NotFound`; a missing expense yields `None`.
    async fn update_expense(
        &self,
        owner: UserId,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, StoreError>;

    /// Deletes an expense. `false` if nothing was deleted.
    async fn delete_expense(&self, owner: UserId, id: ExpenseId) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs.
pub trait TravelStore: UserStore + PlanStore + ExpenseStore {}

impl<T: UserStore + PlanStore + ExpenseStore> TravelStore for T {}

/// Store wiring decided at startup.
#[derive(Clone)]
pub enum StoreHandle {
    /// Backed by a working store.
    Available(Arc<dyn TravelStore>),
    /// No store; requests needing one get 503.
    Unavailable(String),
}

impl StoreHandle {
    /// Wraps a store.
    pub fn available(store: impl TravelStore + 'static) -> Self {
        Self::Available(Arc::new(store))
    }

    /// The store, or `ServiceUnavailable`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ServiceUnavailable` with the startup reason.
    pub fn get(&self) -> Result<&dyn TravelStore, AppError> {
        match self {
            Self::Available(store) => Ok(store.as_ref()),
            Self::Unavailable(reason) => Err(AppError::ServiceUnavailable(format!(
                "Database is not available: {reason}"
            ))),
        }
    }

    /// Whether a store is wired in.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("StoreHandle::Available"),
            Self::Unavailable(reason) => f.debug_tuple("StoreHandle::Unavailable").field(reason).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_handle_maps_to_503() {
        let handle = StoreHandle::Unavailable("no DATABASE url".into());
        assert!(!handle.is_available());

        let err = handle.get().err().unwrap();
        assert_eq!(err.status_code(), 503);
        assert!(err.to_string().contains("no DATABASE url"));
    }

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(AppError::from(StoreError::NotFound("x".into())).status_code(), 404);
        assert_eq!(AppError::from(StoreError::Conflict("x".into())).status_code(), 409);
        assert_eq!(AppError::from(StoreError::Invalid("x".into())).status_code(), 400);
        assert_eq!(AppError::from(StoreError::Backend("x".into())).status_code(), 500);
    }
}
