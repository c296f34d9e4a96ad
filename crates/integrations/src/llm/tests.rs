use chrono::NaiveDate;
use mockito::{Matcher, Server};
use rust_decimal_macros::dec;
use tripwise_core::itinerary::{ItineraryGenerator, ItineraryRequest};
use tripwise_shared::Money;
use tripwise_shared::config::LlmConfig;

use super::*;

const REPLY: &str = r#"{
    "choices": [{
        "message": {
            "role": "assistant",
            "content": "```json\n{\"itinerary\":[{\"day\":1,\"date\":\"2025-05-01\",\"activities\":[{\"type\":\"attraction\",\"name\":\"West Lake\",\"location\":\"Hangzhou\",\"start_time\":\"09:00\",\"end_time\":\"12:00\",\"cost\":50,\"rating\":4.8}],\"total_cost\":50}]}\n```"
        }
    }]
}"#;

fn planner(server: &Server, attempts: u32) -> ChatCompletionPlanner {
    let config = LlmConfig {
        api_key: Some("test-key".to_string()),
        base_url: format!("{}/v1", server.url()),
        ..LlmConfig::default()
    };
    ChatCompletionPlanner::from_config(&config)
        .unwrap()
        .with_retry(RetryPolicy::immediate(attempts))
}

fn request() -> ItineraryRequest {
    ItineraryRequest {
        destination: "Hangzhou".into(),
        start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
        budget: Money::new(dec!(2000)),
        people_count: 2,
        preferences: vec!["food".into()],
        special_requirements: None,
    }
}

#[test]
fn test_requires_api_key() {
    let err = ChatCompletionPlanner::from_config(&LlmConfig::default()).unwrap_err();
    assert!(matches!(err, PlannerError::MissingApiKey));
}

#[tokio::test]
async fn test_generate_uses_model_reply() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({"model": "qwen-turbo"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY)
        .create_async()
        .await;

    let result = planner(&server, 3).generate(&request()).await;

    assert!(result.ai_generated);
    assert!(result.note.is_none());
    assert_eq!(result.itinerary.len(), 1);
    assert_eq!(result.itinerary[0].activities[0].name, "West Lake");
    assert_eq!(result.estimated_cost.amount(), dec!(50.00));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_fails_fast_and_falls_back() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error": "Unauthorized"}"#)
        .expect(1)
        .create_async()
        .await;

    let result = planner(&server, 3).generate(&request()).await;

    assert!(!result.ai_generated);
    assert_eq!(result.itinerary.len(), 2);
    assert_eq!(result.estimated_cost.amount(), dec!(480.00));
    assert!(result.note.unwrap().contains("API key rejected"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(3)
        .create_async()
        .await;

    let err = planner(&server, 3).complete("hello").await.unwrap_err();

    assert!(matches!(err, PlannerError::Status { status: 500, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPLY)
        .expect(1)
        .create_async()
        .await;

    let reply = planner(&server, 3).complete("hello").await.unwrap();

    assert!(reply.contains("West Lake"));
    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_unparseable_reply_falls_back() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"Sorry, I can't plan that trip."}}]}"#)
        .create_async()
        .await;

    let result = planner(&server, 1).generate(&request()).await;

    assert!(!result.ai_generated);
    assert_eq!(result.itinerary.len(), 2);
    assert!(result.note.is_some());
}

#[tokio::test]
async fn test_empty_content_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
        .create_async()
        .await;

    let err = planner(&server, 1).complete("hello").await.unwrap_err();
    assert!(matches!(err, PlannerError::EmptyResponse));
}
