//! Router fixtures for handler tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use tripwise_core::itinerary::TemplatePlanner;
use tripwise_core::store::{StoreHandle, memory::InMemoryStore};
use tripwise_core::voice::{RecognizerStatus, SpeechError, SpeechRecognizer};
use tripwise_shared::{JwtConfig, JwtService};

use crate::{AppState, create_router};

/// Recognizer that always hears the same sentence.
pub struct ScriptedRecognizer(pub &'static str);

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn status(&self) -> RecognizerStatus {
        RecognizerStatus {
            available: true,
            provider: "scripted".into(),
            message: "ready".into(),
        }
    }

    async fn recognize(&self, audio: &[u8], _language: &str) -> Result<String, SpeechError> {
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }
        Ok(self.0.to_string())
    }
}

pub fn state_with(store: StoreHandle, speech: Arc<dyn SpeechRecognizer>) -> AppState {
    AppState {
        store,
        jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
        planner: Arc::new(TemplatePlanner),
        speech,
    }
}

pub fn test_app() -> Router {
    create_router(
        state_with(
            StoreHandle::available(InMemoryStore::new()),
            Arc::new(ScriptedRecognizer("我想去成都，5天，预算8000元，2个人，喜欢美食和拍照")),
        ),
        &[],
    )
}

/// Sends a request and returns the status plus the parsed JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    read(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Registers `name` and returns a bearer token for it.
pub async fn login_as(app: &Router, name: &str) -> String {
    let email = format!("{name}@example.com");
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "username": name, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

/// Creates a plan with the given budget and returns its id.
pub async fn create_plan(app: &Router, token: &str, budget: f64) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/travel-plans",
        Some(token),
        Some(json!({
            "title": "Chengdu food trip",
            "destination": "Chengdu",
            "start_date": "2025-05-01",
            "end_date": "2025-05-03",
            "budget": budget,
            "people_count": 2,
            "preferences": ["food"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}
