//! Day-by-day itinerary generation.
//!
//! An [`ItineraryGenerator`] turns a trip request into a schedule. Generators
//! never fail: when a model cannot be reached or answers with garbage, they
//! fall back to [`default_itinerary`] and say so in the result.

pub mod parse;
pub mod prompt;
pub mod template;
pub mod types;

pub use parse::{ItineraryParseError, parse_itinerary, try_parse_itinerary};
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use template::{TEMPLATE_NOTE, TemplatePlanner, default_itinerary};
pub use types::{Activity, ActivityKind, DayItinerary, GeneratedItinerary, ItineraryRequest};

use async_trait::async_trait;
use chrono::NaiveDate;

/// Produces itineraries for trip requests.
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    /// Short name for logs and health output.
    fn name(&self) -> &'static str;

    /// Generates an itinerary, falling back to the template on failure.
    async fn generate(&self, request: &ItineraryRequest) -> GeneratedItinerary;
}

/// Inclusive number of days between two dates.
#[must_use]
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_days_inclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert_eq!(trip_days(start, start), 1);
        assert_eq!(
            trip_days(start, NaiveDate::from_ymd_opt(2025, 5, 3).unwrap()),
            3
        );
        assert_eq!(
            trip_days(start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            32
        );
    }
}
