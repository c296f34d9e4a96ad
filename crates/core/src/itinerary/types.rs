//! Itinerary data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tripwise_shared::Money;

/// What an activity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Sightseeing.
    Attraction,
    /// A meal.
    Restaurant,
    /// Check-in or overnight stay.
    Hotel,
    /// Getting between places.
    Transport,
    /// Shopping.
    Shopping,
    /// Shows, nightlife, leisure.
    Entertainment,
}

/// One scheduled activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Kind of activity.
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Address or area.
    #[serde(default)]
    pub location: String,
    /// Start time, `HH:MM`.
    #[serde(default)]
    pub start_time: String,
    /// End time, `HH:MM`.
    #[serde(default)]
    pub end_time: String,
    /// Estimated cost.
    #[serde(default)]
    pub cost: Money,
    /// Rating out of 5.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub rating: Option<Decimal>,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Schedule for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayItinerary {
    /// 1-based day number.
    pub day: u32,
    /// Calendar date.
    pub date: NaiveDate,
    /// Activities in order.
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Estimated cost for the day.
    #[serde(default)]
    pub total_cost: Money,
}

/// Trip parameters given to a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryRequest {
    /// Destination.
    pub destination: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Budget for the whole group.
    pub budget: Money,
    /// Travellers.
    pub people_count: i32,
    /// Preference tags.
    pub preferences: Vec<String>,
    /// Free-text requirements.
    pub special_requirements: Option<String>,
}

impl ItineraryRequest {
    /// Inclusive trip length in days.
    #[must_use]
    pub fn days(&self) -> i64 {
        super::trip_days(self.start_date, self.end_date)
    }
}

/// Output of a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedItinerary {
    /// Day-by-day schedule.
    pub itinerary: Vec<DayItinerary>,
    /// Sum of the daily totals.
    pub estimated_cost: Money,
    /// Whether a model produced the schedule.
    pub ai_generated: bool,
    /// Why the template was used, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl GeneratedItinerary {
    /// Wraps a model-produced schedule.
    #[must_use]
    pub fn from_model(itinerary: Vec<DayItinerary>) -> Self {
        Self {
            estimated_cost: estimated_cost(&itinerary),
            itinerary,
            ai_generated: true,
            note: None,
        }
    }

    /// Wraps a template schedule with an explanation.
    #[must_use]
    pub fn fallback(itinerary: Vec<DayItinerary>, note: impl Into<String>) -> Self {
        Self {
            estimated_cost: estimated_cost(&itinerary),
            itinerary,
            ai_generated: false,
            note: Some(note.into()),
        }
    }
}

/// Sum of every day's `total_cost`, capped at [`Money::MAX`].
///
/// Parsed model replies are range-checked already, so the cap only guards
/// hand-built schedules.
#[must_use]
pub fn estimated_cost(itinerary: &[DayItinerary]) -> Money {
    Money::checked_sum(itinerary.iter().map(|day| day.total_cost))
        .filter(Money::is_storable)
        .unwrap_or(Money::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_activity_wire_shape() {
        let json = r#"{
            "type": "restaurant",
            "name": "Hot pot",
            "description": "Spicy",
            "location": "Jinli",
            "start_time": "12:30",
            "end_time": "14:00",
            "cost": 80,
            "rating": 4.3
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityKind::Restaurant);
        assert_eq!(activity.cost.amount(), dec!(80.00));
        assert_eq!(activity.rating, Some(dec!(4.3)));

        let back = serde_json::to_value(&activity).unwrap();
        assert_eq!(back["type"], "restaurant");
        assert_eq!(back["rating"], serde_json::json!(4.3));
        assert!(back.get("image_url").is_none());
    }

    #[test]
    fn test_day_defaults() {
        let day: DayItinerary = serde_json::from_str(r#"{"day":1,"date":"2025-05-01"}"#).unwrap();
        assert!(day.activities.is_empty());
        assert_eq!(day.total_cost, Money::ZERO);
    }

    #[test]
    fn test_unknown_activity_kind_rejected() {
        let json = r#"{"type":"spa","name":"Massage"}"#;
        assert!(serde_json::from_str::<Activity>(json).is_err());
    }
}
