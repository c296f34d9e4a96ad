//! Extraction of itineraries from free-form model replies.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use tripwise_shared::Money;

use super::template::default_itinerary;
use super::types::DayItinerary;

/// Why a model reply could not be used.
#[derive(Debug, Error)]
pub enum ItineraryParseError {
    /// No JSON object or array in the reply.
    #[error("no JSON found in model reply")]
    NoJson,

    /// The JSON did not parse or did not match the itinerary shape.
    #[error("malformed itinerary JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The JSON parsed but holds no days.
    #[error("itinerary is empty")]
    Empty,

    /// The daily totals add up to more than a storable amount.
    #[error("itinerary cost exceeds {}", Money::MAX)]
    CostOutOfRange,
}

/// Locates the JSON payload in a reply.
///
/// Prefers a fenced ```` ```json ```` block, then a reply that is itself an
/// array, then the span from the first `{` to the last `}`, then from the
/// first `[` to the last `]`.
fn extract_json(reply: &str) -> Option<&str> {
    const FENCE: &str = "```json";
    if let Some(pos) = reply.find(FENCE) {
        let body = &reply[pos + FENCE.len()..];
        let end = body.find("```").unwrap_or(body.len());
        return Some(body[..end].trim());
    }

    let trimmed = reply.trim_start();
    if trimmed.starts_with('[') {
        return span(trimmed, '[', ']');
    }
    span(reply, '{', '}').or_else(|| span(reply, '[', ']'))
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a model reply into days.
///
/// Accepts `{"itinerary": [...]}` or a bare list of days.
///
/// # Errors
///
/// Returns an `ItineraryParseError` when no usable itinerary is found.
pub fn try_parse_itinerary(reply: &str) -> Result<Vec<DayItinerary>, ItineraryParseError> {
    let json = extract_json(reply).ok_or(ItineraryParseError::NoJson)?;
    let value: Value = serde_json::from_str(json)?;

    let days_value = match value {
        Value::Object(mut map) => map.remove("itinerary").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    let days: Vec<DayItinerary> = serde_json::from_value(days_value)?;
    if days.is_empty() {
        return Err(ItineraryParseError::Empty);
    }
    Money::checked_sum(days.iter().map(|day| day.total_cost))
        .filter(Money::is_storable)
        .ok_or(ItineraryParseError::CostOutOfRange)?;
    Ok(days)
}

/// Parses a model reply, falling back to the template schedule.
#[must_use]
pub fn parse_itinerary(reply: &str, start: NaiveDate, days: i64) -> Vec<DayItinerary> {
    try_parse_itinerary(reply).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Falling back to template itinerary");
        default_itinerary(start, days)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::types::estimated_cost;
    use rust_decimal_macros::dec;

    const DAY: &str = r#"{"day":1,"date":"2025-05-01","activities":[{"type":"attraction","name":"West Lake","location":"Hangzhou","start_time":"09:00","end_time":"12:00","cost":0,"rating":4.8}],"total_cost":0}"#;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[test]
    fn test_parse_fenced_block() {
        let reply = format!("Here you go:\n```json\n{{\"itinerary\":[{DAY}]}}\n```\nEnjoy!");
        let days = try_parse_itinerary(&reply).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].activities[0].name, "West Lake");
    }

    #[test]
    fn test_parse_embedded_object() {
        let reply = format!("Sure! {{\"itinerary\":[{DAY}]}} Have fun.");
        let days = try_parse_itinerary(&reply).unwrap();
        assert_eq!(days[0].day, 1);
        assert_eq!(days[0].date, start());
    }

    #[test]
    fn test_parse_bare_array() {
        let reply = format!("[{DAY}]");
        let days = try_parse_itinerary(&reply).unwrap();
        assert_eq!(days.len(), 1);
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            try_parse_itinerary("I cannot help with that."),
            Err(ItineraryParseError::NoJson)
        ));
        assert!(matches!(
            try_parse_itinerary("{not json}"),
            Err(ItineraryParseError::Malformed(_))
        ));
        assert!(matches!(
            try_parse_itinerary(r#"{"plan": "none"}"#),
            Err(ItineraryParseError::Empty)
        ));
    }

    #[test]
    fn test_parse_rejects_unstorable_costs() {
        let huge = r#"{"day":1,"date":"2025-05-01","activities":[],"total_cost":7e28}"#;
        assert!(matches!(
            try_parse_itinerary(&format!("[{huge},{huge}]")),
            Err(ItineraryParseError::Malformed(_))
        ));

        let big = r#"{"day":1,"date":"2025-05-01","activities":[],"total_cost":6000000000}"#;
        assert!(matches!(
            try_parse_itinerary(&format!("[{big},{big}]")),
            Err(ItineraryParseError::CostOutOfRange)
        ));

        let days = parse_itinerary(&format!("[{huge},{huge}]"), start(), 2);
        assert_eq!(days.len(), 2);
        assert_eq!(estimated_cost(&days).amount(), dec!(480.00));
    }

    #[test]
    fn test_parse_itinerary_falls_back() {
        let days = parse_itinerary("no json here", start(), 2);
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].total_cost.amount(), dec!(240.00));
    }
}
