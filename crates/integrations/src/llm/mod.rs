//! Itinerary generation through an OpenAI-compatible chat completion API.

mod retry;
mod wire;

#[cfg(test)]
mod tests;

pub use retry::{PlannerError, RetryPolicy};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};
use tripwise_core::itinerary::{
    GeneratedItinerary, ItineraryGenerator, ItineraryRequest, SYSTEM_PROMPT, build_prompt,
    default_itinerary, try_parse_itinerary,
};
use tripwise_shared::config::LlmConfig;

use wire::{ChatMessage, ChatRequest, ChatResponse};

/// Planner that asks a chat model for the itinerary.
///
/// Never fails outward: when the model cannot be reached or its reply is
/// unusable, the template itinerary is returned with a note.
#[derive(Debug, Clone)]
pub struct ChatCompletionPlanner {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry: RetryPolicy,
}

impl ChatCompletionPlanner {
    /// Builds a planner from configuration.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::MissingApiKey` without a key, or
    /// `PlannerError::Transport` if the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self, PlannerError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(PlannerError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PlannerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            retry: RetryPolicy::with_attempts(config.max_attempts),
        })
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends the prompt, retrying per the policy, and returns the reply text.
    ///
    /// # Errors
    ///
    /// Returns the last `PlannerError` once attempts are exhausted, or
    /// immediately on `Unauthorized`.
    pub async fn complete(&self, prompt: &str) -> Result<String, PlannerError> {
        let mut attempt = 1;
        loop {
            debug!(attempt, model = %self.model, "Calling chat completion endpoint");
            match self.complete_once(prompt).await {
                Ok(content) => return Ok(content),
                Err(err) => {
                    let Some(delay) = self.retry.next_delay(&err, attempt) else {
                        error!(attempt, error = %err, "Chat completion failed");
                        return Err(err);
                    };
                    warn!(
                        attempt,
                        error = %err,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Chat completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn complete_once(&self, prompt: &str) -> Result<String, PlannerError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlannerError::from_reqwest(&e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PlannerError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PlannerError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlannerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                PlannerError::Timeout
            } else {
                PlannerError::Decode(e.to_string())
            }
        })?;
        reply.into_content().ok_or(PlannerError::EmptyResponse)
    }
}

#[async_trait]
impl ItineraryGenerator for ChatCompletionPlanner {
    fn name(&self) -> &'static str {
        "chat-completion"
    }

    async fn generate(&self, request: &ItineraryRequest) -> GeneratedItinerary {
        let days = request.days();
        info!(
            destination = %request.destination,
            days,
            people = request.people_count,
            "Generating itinerary"
        );

        let reply = match self.complete(&build_prompt(request)).await {
            Ok(reply) => reply,
            Err(err) => {
                return GeneratedItinerary::fallback(
                    default_itinerary(request.start_date, days),
                    format!("AI service temporarily unavailable: {err}"),
                );
            }
        };

        match try_parse_itinerary(&reply) {
            Ok(itinerary) => {
                info!(days = itinerary.len(), "Itinerary generated by model");
                GeneratedItinerary::from_model(itinerary)
            }
            Err(err) => {
                warn!(error = %err, "Model reply was not a usable itinerary");
                GeneratedItinerary::fallback(
                    default_itinerary(request.start_date, days),
                    format!("AI response could not be used: {err}"),
                )
            }
        }
    }
}
