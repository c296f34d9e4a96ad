//! Travel plan data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tripwise_shared::{Money, TravelPlanId, UserId};

use super::error::PlanError;
use crate::itinerary::DayItinerary;

/// Maximum title and destination length, in characters.
pub const TEXT_MAX_CHARS: usize = 255;

/// Plan lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Being edited.
    #[default]
    Draft,
    /// Shared or finalized.
    Published,
    /// Trip is over.
    Completed,
}

impl PlanStatus {
    /// Storage key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "completed" => Ok(Self::Completed),
            other => Err(PlanError::UnknownStatus(other.to_string())),
        }
    }
}

/// A stored travel plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPlan {
    /// Plan ID.
    pub id: TravelPlanId,
    /// Owner.
    pub user_id: UserId,
    /// Title.
    pub title: String,
    /// Destination.
    pub destination: String,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
    /// Total budget.
    pub budget: Money,
    /// Number of travellers.
    pub people_count: i32,
    /// Preference tags.
    pub preferences: Vec<String>,
    /// Day-by-day schedule.
    pub itinerary: Option<Vec<DayItinerary>>,
    /// Cached sum of the plan's expenses.
    pub total_cost: Money,
    /// Status.
    pub status: PlanStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TravelPlan {
    /// Number of calendar days covered, inclusive.
    #[must_use]
    pub fn days(&self) -> i64 {
        crate::itinerary::trip_days(self.start_date, self.end_date)
    }
}

/// Input for creating a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTravelPlan {
    /// Title.
    pub title: String,
    /// Destination.
    pub destination: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Budget.
    pub budget: Money,
    /// Travellers.
    pub people_count: i32,
    /// Preference tags.
    pub preferences: Vec<String>,
    /// Pre-built schedule, if any.
    pub itinerary: Option<Vec<DayItinerary>>,
    /// Initial status.
    pub status: PlanStatus,
}

impl NewTravelPlan {
    /// Validates every field.
    ///
    /// # Errors
    ///
    /// Returns the first `PlanError` found.
    pub fn validate(&self) -> Result<(), PlanError> {
        validate_text("title", &self.title)?;
        validate_text("destination", &self.destination)?;
        validate_dates(self.start_date, self.end_date)?;
        validate_budget(self.budget)?;
        validate_people(self.people_count)
    }

    /// Builds the stored plan with a zero total cost.
    #[must_use]
    pub fn into_plan(self, id: TravelPlanId, owner: UserId, now: DateTime<Utc>) -> TravelPlan {
        TravelPlan {
            id,
            user_id: owner,
            title: self.title,
            destination: self.destination,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            people_count: self.people_count,
            preferences: self.preferences,
            itinerary: self.itinerary,
            total_cost: Money::ZERO,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a plan. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelPlanPatch {
    /// New title.
    pub title: Option<String>,
    /// New destination.
    pub destination: Option<String>,
    /// New start date.
    pub start_date: Option<NaiveDate>,
    /// New end date.
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

impl TravelPlanPatch {
    /// Validates the patch against the plan it will be applied to.
    ///
    /// Dates are checked on the merged result, so moving only one end of
    /// the range is still caught.
    ///
    /// # Errors
    ///
    /// Returns the first `PlanError` found.
    pub fn validate_against(&self, current: &TravelPlan) -> Result<(), PlanError> {
        if let Some(title) = &self.title {
            validate_text("title", title)?;
        }
        if let Some(destination) = &self.destination {
            validate_text("destination", destination)?;
        }
        validate_dates(
            self.start_date.unwrap_or(current.start_date),
            self.end_date.unwrap_or(current.end_date),
        )?;
        if let Some(budget) = self.budget {
            validate_budget(budget)?;
        }
        if let Some(people) = self.people_count {
            validate_people(people)?;
        }
        Ok(())
    }

    /// Applies the patch in place and bumps `updated_at`.
    pub fn apply_to(&self, plan: &mut TravelPlan, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            plan.title.clone_from(title);
        }
        if let Some(destination) = &self.destination {
            plan.destination.clone_from(destination);
        }
        if let Some(start) = self.start_date {
            plan.start_date = start;
        }
        if let Some(end) = self.end_date {
            plan.end_date = end;
        }
        if let Some(budget) = self.budget {
            plan.budget = budget;
        }
        if let Some(people) = self.people_count {
            plan.people_count = people;
        }
        if let Some(preferences) = &self.preferences {
            plan.preferences.clone_from(preferences);
        }
        if let Some(status) = self.status {
            plan.status = status;
        }
        plan.updated_at = now;
    }
}

fn validate_text(field: &'static str, value: &str) -> Result<(), PlanError> {
    let len = value.trim().chars().count();
    if len == 0 || value.chars().count() > TEXT_MAX_CHARS {
        return Err(PlanError::TextLength {
            field,
            max: TEXT_MAX_CHARS,
        });
    }
    Ok(())
}

fn validate_dates(start: NaiveDate, end: NaiveDate) -> Result<(), PlanError> {
    if start > end {
        return Err(PlanError::InvalidDateRange { start, end });
    }
    Ok(())
}

fn validate_budget(budget: Money) -> Result<(), PlanError> {
    if budget.is_negative() {
        return Err(PlanError::NegativeBudget);
    }
    if !budget.is_storable() {
        return Err(PlanError::BudgetTooLarge);
    }
    Ok(())
}

fn validate_people(people: i32) -> Result<(), PlanError> {
    if people < 1 {
        return Err(PlanError::InvalidPeopleCount(people));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn new_plan() -> NewTravelPlan {
        NewTravelPlan {
            title: "Chengdu food trip".into(),
            destination: "Chengdu".into(),
            start_date: date(1),
            end_date: date(3),
            budget: Money::new(dec!(3000)),
            people_count: 2,
            preferences: vec!["food".into()],
            itinerary: None,
            status: PlanStatus::Draft,
        }
    }

    #[test]
    fn test_valid_plan() {
        assert!(new_plan().validate().is_ok());
    }

    #[test]
    fn test_budget_upper_bound() {
        let at_max = NewTravelPlan {
            budget: Money::MAX,
            ..new_plan()
        };
        assert!(at_max.validate().is_ok());

        let too_large = NewTravelPlan {
            budget: Money::new(dec!(10000000000)),
            ..new_plan()
        };
        assert_eq!(too_large.validate(), Err(PlanError::BudgetTooLarge));
    }

    #[test]
    fn test_single_day_trip_allowed() {
        let plan = NewTravelPlan {
            end_date: date(1),
            ..new_plan()
        };
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_rejects_reversed_dates() {
        let plan = NewTravelPlan {
            start_date: date(5),
            end_date: date(1),
            ..new_plan()
        };
        assert_eq!(
            plan.validate(),
            Err(PlanError::InvalidDateRange {
                start: date(5),
                end: date(1)
            })
        );
    }

    #[test]
    fn test_rejects_bad_fields() {
        let blank = NewTravelPlan {
            title: "   ".into(),
            ..new_plan()
        };
        assert!(matches!(
            blank.validate(),
            Err(PlanError::TextLength { field: "title", .. })
        ));

        let long = NewTravelPlan {
            destination: "x".repeat(TEXT_MAX_CHARS + 1),
            ..new_plan()
        };
        assert!(matches!(
            long.validate(),
            Err(PlanError::TextLength {
                field: "destination",
                ..
            })
        ));

        let broke = NewTravelPlan {
            budget: Money::new(dec!(-1)),
            ..new_plan()
        };
        assert_eq!(broke.validate(), Err(PlanError::NegativeBudget));

        let nobody = NewTravelPlan {
            people_count: 0,
            ..new_plan()
        };
        assert_eq!(nobody.validate(), Err(PlanError::InvalidPeopleCount(0)));
    }

    #[test]
    fn test_patch_checks_merged_dates() {
        let plan = new_plan().into_plan(TravelPlanId::new(1), UserId::new(1), Utc::now());

        let moves_end_before_start = TravelPlanPatch {
            end_date: Some(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()),
            ..TravelPlanPatch::default()
        };
        assert!(matches!(
            moves_end_before_start.validate_against(&plan),
            Err(PlanError::InvalidDateRange { .. })
        ));

        let extends = TravelPlanPatch {
            end_date: Some(date(10)),
            ..TravelPlanPatch::default()
        };
        assert!(extends.validate_against(&plan).is_ok());
    }

    #[test]
    fn test_patch_apply() {
        let created = Utc::now();
        let mut plan = new_plan().into_plan(TravelPlanId::new(1), UserId::new(1), created);
        let patch = TravelPlanPatch {
            title: Some("Renamed".into()),
            status: Some(PlanStatus::Published),
            ..TravelPlanPatch::default()
        };
        patch.apply_to(&mut plan, created);

        assert_eq!(plan.title, "Renamed");
        assert_eq!(plan.status, PlanStatus::Published);
        assert_eq!(plan.destination, "Chengdu");
        assert_eq!(plan.total_cost, Money::ZERO);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("published".parse::<PlanStatus>(), Ok(PlanStatus::Published));
        assert_eq!(
            "archived".parse::<PlanStatus>(),
            Err(PlanError::UnknownStatus("archived".into()))
        );
        assert_eq!(PlanStatus::default(), PlanStatus::Draft);
    }
}
