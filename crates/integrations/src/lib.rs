//! Outside services behind the `tripwise-core` seams.
//!
//! - [`llm::ChatCompletionPlanner`] implements `ItineraryGenerator` over an
//!   OpenAI-compatible chat completion endpoint.
//! - [`speech::XfyunRecognizer`] implements `SpeechRecognizer` over the
//!   iFlytek streaming dictation websocket.

pub mod llm;
pub mod speech;

pub use llm::{ChatCompletionPlanner, PlannerError, RetryPolicy};
pub use speech::XfyunRecognizer;
