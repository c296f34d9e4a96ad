//! Failure classification and backoff for chat completion calls.

use std::time::Duration;

use thiserror::Error;

/// Errors from the chat completion endpoint.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The API key was rejected.
    #[error("API key rejected by the model endpoint")]
    Unauthorized,

    /// Too many requests.
    #[error("model endpoint rate limit reached")]
    RateLimited,

    /// The request timed out.
    #[error("model endpoint timed out")]
    Timeout,

    /// Non-success HTTP status.
    #[error("model endpoint returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// Network or client failure.
    #[error("request to model endpoint failed: {0}")]
    Transport(String),

    /// The reply could not be decoded.
    #[error("unreadable model response: {0}")]
    Decode(String),

    /// The reply had no message content.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// No API key configured.
    #[error("no API key configured")]
    MissingApiKey,
}

impl PlannerError {
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// How many times to call the endpoint and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, at least one.
    pub max_attempts: u32,
    /// Wait after a 429.
    pub rate_limit_delay: Duration,
    /// Wait after a timeout.
    pub timeout_delay: Duration,
    /// Wait after any other failure.
    pub error_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_delay: Duration::from_secs(5),
            timeout_delay: Duration::from_secs(3),
            error_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Default delays with a custom attempt count.
    #[must_use]
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// No waiting between attempts.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            rate_limit_delay: Duration::ZERO,
            timeout_delay: Duration::ZERO,
            error_delay: Duration::ZERO,
        }
    }

    /// Delay before the next attempt, or `None` to give up.
    #[must_use]
    pub fn next_delay(&self, err: &PlannerError, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        match err {
            PlannerError::Unauthorized | PlannerError::MissingApiKey => None,
            PlannerError::RateLimited => Some(self.rate_limit_delay),
            PlannerError::Timeout => Some(self.timeout_delay),
            _ => Some(self.error_delay),
        }
    }
}
