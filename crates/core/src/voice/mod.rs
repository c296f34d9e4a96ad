//! Speech input: audio preparation, recognizer seam and intent extraction.

pub mod intent;
pub mod wav;

pub use intent::{ExpenseIntent, TravelIntent, parse_expense_intent, parse_travel_intent};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tripwise_shared::AppError;

/// Language used when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "zh_cn";

/// Errors from a speech recognizer.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Credentials are missing.
    #[error("speech recognition is not configured")]
    NotConfigured,

    /// Nothing to recognize.
    #[error("audio is empty")]
    EmptyAudio,

    /// The clip is longer than one dictation session carries.
    #[error("audio is longer than {max_seconds} seconds")]
    AudioTooLong {
        /// Accepted length.
        max_seconds: usize,
    },

    /// Could not reach the service.
    #[error("speech service connection failed: {0}")]
    Connection(String),

    /// The service sent something unexpected.
    #[error("unexpected speech service message: {0}")]
    Protocol(String),

    /// The service reported an error.
    #[error("speech service error {code}: {message}")]
    Service {
        /// Service error code.
        code: i64,
        /// Service error message.
        message: String,
    },
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::EmptyAudio | SpeechError::AudioTooLong { .. } => {
                Self::Validation(err.to_string())
            }
            other => Self::ServiceUnavailable(other.to_string()),
        }
    }
}

/// Availability report for the voice status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerStatus {
    /// Whether recognition requests can be served.
    pub available: bool,
    /// Backing provider.
    pub provider: String,
    /// Human-readable detail.
    pub message: String,
}

/// Converts speech audio to text.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Current availability.
    fn status(&self) -> RecognizerStatus;

    /// Recognizes 16 kHz 16-bit mono PCM or WAV audio.
    async fn recognize(&self, audio: &[u8], language: &str) -> Result<String, SpeechError>;
}

/// Recognizer used when no credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredRecognizer;

#[async_trait]
impl SpeechRecognizer for UnconfiguredRecognizer {
    fn status(&self) -> RecognizerStatus {
        RecognizerStatus {
            available: false,
            provider: "none".to_string(),
            message: "Speech recognition credentials are not configured".to_string(),
        }
    }

    async fn recognize(&self, _audio: &[u8], _language: &str) -> Result<String, SpeechError> {
        Err(SpeechError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_recognizer() {
        let recognizer = UnconfiguredRecognizer;
        assert!(!recognizer.status().available);

        let err = recognizer.recognize(b"pcm", DEFAULT_LANGUAGE).await.unwrap_err();
        assert!(matches!(err, SpeechError::NotConfigured));
        assert_eq!(AppError::from(err).status_code(), 503);
    }

    #[test]
    fn test_empty_audio_is_client_error() {
        assert_eq!(AppError::from(SpeechError::EmptyAudio).status_code(), 400);
    }
}
