//! Expense routes, budget analysis and the per-user summary.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::AppJson,
    middleware::AuthUser,
    response::ApiResponse,
};
use tripwise_core::budget::{BudgetAnalyzer, BudgetReport};
use tripwise_core::expense::{Expense, ExpenseCategory, ExpensePatch, ExpenseSummary, NewExpense};
use tripwise_core::store::StoreError;
use tripwise_shared::types::dates::{deserialize_datetime, deserialize_opt_datetime};
use tripwise_shared::{AppError, ExpenseId, Money, TravelPlanId};

/// Creates the expense routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense))
        .route(
            "/expenses/{expense_id}",
            put(update_expense).delete(delete_expense),
        )
        .route("/expenses/travel-plan/{plan_id}", get(list_plan_expenses))
        .route("/expenses/budget-analysis/{plan_id}", get(budget_analysis))
        .route("/expenses/summary/user", get(user_summary))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for recording an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Plan the expense belongs to.
    pub travel_plan_id: TravelPlanId,
    /// Category key.
    pub category: String,
    /// Amount spent.
    pub amount: Money,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// When the money was spent.
    #[serde(deserialize_with = "deserialize_datetime")]
    pub expense_date: DateTime<Utc>,
}

impl CreateExpenseRequest {
    fn into_new_expense(self) -> Result<NewExpense, ApiError> {
        Ok(NewExpense {
            travel_plan_id: self.travel_plan_id,
            category: self.category.parse()?,
            amount: self.amount,
            description: self.description,
            expense_date: self.expense_date,
        })
    }
}

/// Request body for updating an expense. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    /// Move to another of the caller's plans.
    pub travel_plan_id: Option<TravelPlanId>,
    /// New category key.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<Money>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    #[serde(default, deserialize_with = "deserialize_opt_datetime")]
    pub expense_date: Option<DateTime<Utc>>,
}

impl UpdateExpenseRequest {
    fn into_patch(self) -> Result<ExpensePatch, ApiError> {
        Ok(ExpensePatch {
            travel_plan_id: self.travel_plan_id,
            category: self
                .category
                .as_deref()
                .map(str::parse::<ExpenseCategory>)
                .transpose()?,
            amount: self.amount,
            description: self.description,
            expense_date: self.expense_date,
        })
    }
}

/// Query parameters for listing a plan's expenses.
#[derive(Debug, Deserialize)]
pub struct ListExpensesQuery {
    /// Only expenses in this category.
    pub category: Option<String>,
}

fn plan_not_found() -> ApiError {
    ApiError(AppError::NotFound("Travel plan not found".into()))
}

fn expense_not_found() -> ApiError {
    ApiError(AppError::NotFound("Expense not found".into()))
}

fn unknown_target_plan() -> ApiError {
    ApiError(AppError::Validation(
        "Travel plan does not exist or is not yours".into(),
    ))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/expenses - Record an expense and refresh the plan total.
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<CreateExpenseRequest>,
) -> ApiResult<ApiResponse<Expense>> {
    let store = state.store.get()?;
    let new_expense = payload.into_new_expense()?;
    new_expense.validate()?;

    let expense = store
        .create_expense(auth.user_id(), new_expense)
        .await?
        .ok_or_else(unknown_target_plan)?;

    info!(
        user_id = %auth.user_id(),
        plan_id = %expense.travel_plan_id,
        expense_id = %expense.id,
        "Expense recorded"
    );
    Ok(ApiResponse::new("Expense recorded", expense))
}

/// GET /api/expenses/travel-plan/{plan_id} - Newest expense date first.
async fn list_plan_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<TravelPlanId>,
    Query(query): Query<ListExpensesQuery>,
) -> ApiResult<ApiResponse<Vec<Expense>>> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(str::parse::<ExpenseCategory>)
        .transpose()?;

    let expenses = state
        .store
        .get()?
        .list_plan_expenses(auth.user_id(), plan_id, category)
        .await?
        .ok_or_else(plan_not_found)?;
    Ok(ApiResponse::ok(expenses))
}

/// PUT /api/expenses/{expense_id}
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
    AppJson(payload): AppJson<UpdateExpenseRequest>,
) -> ApiResult<ApiResponse<Expense>> {
    let store = state.store.get()?;
    let patch = payload.into_patch()?;
    patch.validate()?;

    let expense = match store.update_expense(auth.user_id(), expense_id, patch).await {
        Ok(Some(expense)) => expense,
        Ok(None) => return Err(expense_not_found()),
        Err(StoreError::NotFound(_)) => return Err(unknown_target_plan()),
        Err(other) => return Err(other.into()),
    };

    info!(expense_id = %expense.id, plan_id = %expense.travel_plan_id, "Expense updated");
    Ok(ApiResponse::new("Expense updated", expense))
}

/// DELETE /api/expenses/{expense_id}
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<ExpenseId>,
) -> ApiResult<ApiResponse<()>> {
    if !state
        .store
        .get()?
        .delete_expense(auth.user_id(), expense_id)
        .await?
    {
        return Err(expense_not_found());
    }
    info!(user_id = %auth.user_id(), expense_id = %expense_id, "Expense deleted");
    Ok(ApiResponse::empty("Expense deleted"))
}

/// GET /api/expenses/budget-analysis/{plan_id}
async fn budget_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<TravelPlanId>,
) -> ApiResult<ApiResponse<BudgetReport>> {
    let store = state.store.get()?;
    let plan = store
        .find_plan(auth.user_id(), plan_id)
        .await?
        .ok_or_else(plan_not_found)?;
    let expenses = store
        .list_plan_expenses(auth.user_id(), plan_id, None)
        .await?
        .ok_or_else(plan_not_found)?;

    let report = BudgetAnalyzer::default().analyze_expenses(plan.budget, &expenses);
    info!(
        plan_id = %plan_id,
        total_spent = %report.total_spent,
        "Budget analysis computed"
    );
    Ok(ApiResponse::ok(report))
}

/// GET /api/expenses/summary/user - Totals across all of the caller's plans.
async fn user_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<ExpenseSummary>> {
    let store = state.store.get()?;
    let expenses = store.list_user_expenses(auth.user_id()).await?;
    let plan_count = store.count_plans(auth.user_id()).await?;
    Ok(ApiResponse::ok(ExpenseSummary::from_expenses(
        &expenses, plan_count,
    )))
}
