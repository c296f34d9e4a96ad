//! Template itinerary used when no model is available.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use tripwise_shared::Money;

use super::ItineraryGenerator;
use super::types::{Activity, ActivityKind, DayItinerary, GeneratedItinerary, ItineraryRequest};

/// Note attached to template itineraries.
pub const TEMPLATE_NOTE: &str = "Generated from the default template; adjust as needed";

struct TemplateSlot {
    kind: ActivityKind,
    name: &'static str,
    description: &'static str,
    location: &'static str,
    start_time: &'static str,
    end_time: &'static str,
    cost: i64,
    rating_tenths: i64,
}

const SLOTS: [TemplateSlot; 3] = [
    TemplateSlot {
        kind: ActivityKind::Attraction,
        name: "Sightseeing",
        description: "Visit the best-known local sights",
        location: "City center",
        start_time: "09:00",
        end_time: "12:00",
        cost: 100,
        rating_tenths: 45,
    },
    TemplateSlot {
        kind: ActivityKind::Restaurant,
        name: "Local cuisine",
        description: "Try the regional specialities",
        location: "Food street",
        start_time: "12:30",
        end_time: "14:00",
        cost: 80,
        rating_tenths: 43,
    },
    TemplateSlot {
        kind: ActivityKind::Attraction,
        name: "Cultural experience",
        description: "Learn about the local culture",
        location: "Cultural district",
        start_time: "15:00",
        end_time: "18:00",
        cost: 60,
        rating_tenths: 42,
    },
];

/// Three fixed activities per day, 240 per day in total.
///
/// A non-positive `days` yields an empty schedule.
#[must_use]
pub fn default_itinerary(start: NaiveDate, days: i64) -> Vec<DayItinerary> {
    let days = u32::try_from(days.max(0)).unwrap_or(u32::MAX);
    (0..days)
        .map_while(|offset| {
            let date = start.checked_add_days(Days::new(u64::from(offset)))?;
            let activities: Vec<Activity> = SLOTS
                .iter()
                .map(|slot| Activity {
                    kind: slot.kind,
                    name: slot.name.to_string(),
                    description: Some(slot.description.to_string()),
                    location: slot.location.to_string(),
                    start_time: slot.start_time.to_string(),
                    end_time: slot.end_time.to_string(),
                    cost: Money::new(Decimal::from(slot.cost)),
                    rating: Some(Decimal::new(slot.rating_tenths, 1)),
                    image_url: None,
                })
                .collect();
            let total_cost = activities.iter().map(|a| a.cost).sum();
            Some(DayItinerary {
                day: offset + 1,
                date,
                activities,
                total_cost,
            })
        })
        .collect()
}

/// Generator that always returns the template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePlanner;

#[async_trait]
impl ItineraryGenerator for TemplatePlanner {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, request: &ItineraryRequest) -> GeneratedItinerary {
        tracing::info!(
            destination = %request.destination,
            days = request.days(),
            "No itinerary model configured, using template"
        );
        GeneratedItinerary::fallback(
            default_itinerary(request.start_date, request.days()),
            TEMPLATE_NOTE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 30).unwrap()
    }

    #[test]
    fn test_default_itinerary_shape() {
        let days = default_itinerary(start(), 3);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[2].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        for day in &days {
            assert_eq!(day.activities.len(), 3);
            assert_eq!(day.total_cost.amount(), dec!(240.00));
        }
        assert_eq!(days[0].activities[1].kind, ActivityKind::Restaurant);
        assert_eq!(days[0].activities[0].rating, Some(dec!(4.5)));
    }

    #[test]
    fn test_default_itinerary_non_positive_days() {
        assert!(default_itinerary(start(), 0).is_empty());
        assert!(default_itinerary(start(), -2).is_empty());
    }

    #[tokio::test]
    async fn test_template_planner() {
        let request = ItineraryRequest {
            destination: "Xi'an".into(),
            start_date: start(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            budget: Money::new(dec!(2000)),
            people_count: 1,
            preferences: vec![],
            special_requirements: None,
        };

        let generated = TemplatePlanner.generate(&request).await;
        assert!(!generated.ai_generated);
        assert_eq!(generated.itinerary.len(), 2);
        assert_eq!(generated.estimated_cost.amount(), dec!(480.00));
        assert_eq!(generated.note.as_deref(), Some(TEMPLATE_NOTE));
    }
}
