//! Travel plans.

pub mod error;
pub mod types;

pub use error::PlanError;
pub use types::{
    NewTravelPlan, PlanStatus, TEXT_MAX_CHARS, TravelPlan, TravelPlanPatch,
};
