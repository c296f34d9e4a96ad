//! Travel plan routes.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::AppJson,
    middleware::AuthUser,
    response::ApiResponse,
};
use tripwise_core::itinerary::{DayItinerary, ItineraryRequest};
use tripwise_core::plan::{NewTravelPlan, PlanStatus, TravelPlan, TravelPlanPatch};
use tripwise_shared::types::dates::{deserialize_date, deserialize_opt_date};
use tripwise_shared::{AppError, Money, TravelPlanId};

/// Creates the travel plan routes (auth middleware is applied by the caller).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/travel-plans", get(list_plans).post(create_plan))
        .route("/travel-plans/generate", post(generate_plan))
        .route(
            "/travel-plans/{plan_id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing plans.
#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    /// Only plans with this status.
    pub status: Option<String>,
}

const fn default_people() -> i32 {
    1
}

/// Request body for creating a plan.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    /// Title.
    pub title: String,
    /// Destination.
    pub destination: String,
    /// First day.
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    /// Last day.
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    /// Total budget.
    pub budget: Money,
    /// Number of travellers.
    #[serde(default = "default_people")]
    pub people_count: i32,
    /// Preference tags.
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Day-by-day schedule.
    #[serde(default)]
    pub itinerary: Option<Vec<DayItinerary>>,
    /// Initial status, draft when omitted.
    #[serde(default)]
    pub status: PlanStatus,
}

impl From<CreatePlanRequest> for NewTravelPlan {
    fn from(req: CreatePlanRequest) -> Self {
        Self {
            title: req.title,
            destination: req.destination,
            start_date: req.start_date,
            end_date: req.end_date,
            budget: req.budget,
            people_count: req.people_count,
            preferences: req.preferences,
            itinerary: req.itinerary,
            status: req.status,
        }
    }
}

/// Request body for generating a plan.
#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    /// Destination.
    pub destination: String,
    /// First day.
    #[serde(deserialize_with = "deserialize_date")]
    pub start_date: NaiveDate,
    /// Last day.
    #[serde(deserialize_with = "deserialize_date")]
    pub end_date: NaiveDate,
    /// Total budget.
    pub budget: Money,
    /// Number of travellers.
    #[serde(default = "default_people")]
    pub people_count: i32,
    /// Preference tags.
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Free-form wishes passed to the planner.
    #[serde(default)]
    pub special_requirements: Option<String>,
}

/// Request body for updating a plan. Omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlanRequest {
    /// New title.
    pub title: Option<String>,
    /// New destination.
    pub destination: Option<String>,
    /// New start date.
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub start_date: Option<NaiveDate>,
    /// New end date.
    #[serde(default, deserialize_with = "deserialize_opt_date")]
    pub end_date: Option<NaiveDate>,
    /// New budget.
    pub budget: Option<Money>,
    /// New traveller count.
    pub people_count: Option<i32>,
    /// New preference tags.
    pub preferences: Option<Vec<String>>,
    /// New status.
    pub status: Option<PlanStatus>,
}

impl From<UpdatePlanRequest> for TravelPlanPatch {
    fn from(req: UpdatePlanRequest) -> Self {
        Self {
            title: req.title,
            destination: req.destination,
            start_date: req.start_date,
            end_date: req.end_date,
            budget: req.budget,
            people_count: req.people_count,
            preferences: req.preferences,
            status: req.status,
        }
    }
}

/// A freshly generated plan and how it was produced.
#[derive(Debug, Serialize)]
pub struct GeneratedPlanResponse {
    /// The stored draft.
    #[serde(flatten)]
    pub plan: TravelPlan,
    /// Sum of the itinerary's daily totals.
    pub estimated_cost: Money,
    /// Whether a model produced the itinerary.
    pub ai_generated: bool,
    /// Why the template was used, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

fn plan_not_found() -> ApiError {
    ApiError(AppError::NotFound("Travel plan not found".into()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/travel-plans - The caller's plans, newest first.
async fn list_plans(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListPlansQuery>,
) -> ApiResult<ApiResponse<Vec<TravelPlan>>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<PlanStatus>)
        .transpose()?;

    let plans = state.store.get()?.list_plans(auth.user_id(), status).await?;
    info!(user_id = %auth.user_id(), count = plans.len(), "Listed travel plans");
    Ok(ApiResponse::ok(plans))
}

/// GET /api/travel-plans/{plan_id}
async fn get_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<TravelPlanId>,
) -> ApiResult<ApiResponse<TravelPlan>> {
    let plan = state
        .store
        .get()?
        .find_plan(auth.user_id(), plan_id)
        .await?
        .ok_or_else(plan_not_found)?;
    Ok(ApiResponse::ok(plan))
}

/// POST /api/travel-plans
async fn create_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<CreatePlanRequest>,
) -> ApiResult<ApiResponse<TravelPlan>> {
    let store = state.store.get()?;
    let new_plan = NewTravelPlan::from(payload);
    new_plan.validate()?;

    let plan = store.create_plan(auth.user_id(), new_plan).await?;
    info!(user_id = %auth.user_id(), plan_id = %plan.id, "Travel plan created");
    Ok(ApiResponse::new("Travel plan created", plan))
}

/// POST /api/travel-plans/generate - Build an itinerary and save it as a draft.
async fn generate_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<GeneratePlanRequest>,
) -> ApiResult<ApiResponse<GeneratedPlanResponse>> {
    let store = state.store.get()?;

    let mut new_plan = NewTravelPlan {
        title: format!("{} trip", payload.destination.trim()),
        destination: payload.destination,
        start_date: payload.start_date,
        end_date: payload.end_date,
        budget: payload.budget,
        people_count: payload.people_count,
        preferences: payload.preferences,
        itinerary: None,
        status: PlanStatus::Draft,
    };
    new_plan.validate()?;

    info!(
        user_id = %auth.user_id(),
        destination = %new_plan.destination,
        planner = state.planner.name(),
        "Generating itinerary"
    );
    let generated = state
        .planner
        .generate(&ItineraryRequest {
            destination: new_plan.destination.clone(),
            start_date: new_plan.start_date,
            end_date: new_plan.end_date,
            budget: new_plan.budget,
            people_count: new_plan.people_count,
            preferences: new_plan.preferences.clone(),
            special_requirements: payload.special_requirements,
        })
        .await;

    new_plan.itinerary = Some(generated.itinerary);
    let plan = store.create_plan(auth.user_id(), new_plan).await?;

    info!(
        plan_id = %plan.id,
        ai_generated = generated.ai_generated,
        "Generated travel plan saved"
    );
    Ok(ApiResponse::new(
        "Travel plan generated",
        GeneratedPlanResponse {
            plan,
            estimated_cost: generated.estimated_cost,
            ai_generated: generated.ai_generated,
            note: generated.note,
        },
    ))
}

/// PUT /api/travel-plans/{plan_id}
async fn update_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<TravelPlanId>,
    AppJson(payload): AppJson<UpdatePlanRequest>,
) -> ApiResult<ApiResponse<TravelPlan>> {
    let store = state.store.get()?;
    let current = store
        .find_plan(auth.user_id(), plan_id)
        .await?
        .ok_or_else(plan_not_found)?;

    let patch = TravelPlanPatch::from(payload);
    patch.validate_against(&current)?;

    let plan = store
        .update_plan(auth.user_id(), plan_id, patch)
        .await?
        .ok_or_else(plan_not_found)?;
    info!(plan_id = %plan.id, "Travel plan updated");
    Ok(ApiResponse::new("Travel plan updated", plan))
}

/// DELETE /api/travel-plans/{plan_id} - Also removes the plan's expenses.
async fn delete_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(plan_id): Path<TravelPlanId>,
) -> ApiResult<ApiResponse<()>> {
    if !state
        .store
        .get()?
        .delete_plan(auth.user_id(), plan_id)
        .await?
    {
        return Err(plan_not_found());
    }
    info!(user_id = %auth.user_id(), plan_id = %plan_id, "Travel plan deleted");
    Ok(ApiResponse::empty("Travel plan deleted"))
}
