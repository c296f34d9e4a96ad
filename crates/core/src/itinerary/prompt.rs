//! Prompt construction for chat-completion models.

use std::fmt::Write as _;

use super::types::ItineraryRequest;

/// System message sent with every request.
pub const SYSTEM_PROMPT: &str = "You are a professional travel planning assistant. \
Reply strictly with the JSON itinerary requested, no other text.";

/// Builds the user message asking for a JSON itinerary.
#[must_use]
pub fn build_prompt(request: &ItineraryRequest) -> String {
    let days = request.days();
    let start = request.start_date.format("%Y-%m-%d");
    let preferences = if request.preferences.is_empty() {
        "none in particular".to_string()
    } else {
        request.preferences.join(", ")
    };

    let mut prompt = format!(
        "Plan a {days}-day trip to {destination}.\n\
         - Travellers: {people}, total budget: {budget}\n\
         - Preferences: {preferences}\n",
        destination = request.destination,
        people = request.people_count,
        budget = request.budget,
    );
    if let Some(extra) = request
        .special_requirements
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        let _ = writeln!(prompt, "- Special requirements: {extra}");
    }
    let _ = write!(
        prompt,
        r#"- Start date: {start}

Return JSON with 3-4 activities per day:
{{
  "itinerary": [
    {{
      "day": 1,
      "date": "{start}",
      "activities": [
        {{"type": "attraction", "name": "Sight name", "description": "Summary", "location": "Address", "start_time": "09:00", "end_time": "12:00", "cost": 100, "rating": 4.5}},
        {{"type": "restaurant", "name": "Restaurant name", "description": "Speciality", "location": "Address", "start_time": "12:30", "end_time": "14:00", "cost": 80, "rating": 4.3}}
      ],
      "total_cost": 180
    }}
  ]
}}

Activity type must be one of attraction, restaurant, hotel, transport, shopping, entertainment. Keep costs realistic. Return only the JSON."#
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tripwise_shared::Money;

    fn request() -> ItineraryRequest {
        ItineraryRequest {
            destination: "Hangzhou".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
            budget: Money::new(dec!(5000)),
            people_count: 2,
            preferences: vec!["food".into(), "culture".into()],
            special_requirements: None,
        }
    }

    #[test]
    fn test_prompt_mentions_request() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("3-day trip to Hangzhou"));
        assert!(prompt.contains("Travellers: 2, total budget: 5000.00"));
        assert!(prompt.contains("Preferences: food, culture"));
        assert!(prompt.contains(r#""date": "2025-05-01""#));
        assert!(prompt.contains("3-4 activities per day"));
        assert!(!prompt.contains("Special requirements"));
    }

    #[test]
    fn test_prompt_special_requirements() {
        let prompt = build_prompt(&ItineraryRequest {
            special_requirements: Some("wheelchair access".into()),
            preferences: vec![],
            ..request()
        });
        assert!(prompt.contains("- Special requirements: wheelchair access"));
        assert!(prompt.contains("Preferences: none in particular"));
    }
}
