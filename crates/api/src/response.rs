//! Success envelope.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{ "code": 200, "message": ..., "data": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    /// Always 200.
    pub code: u16,
    /// Human-readable outcome.
    pub message: &'static str,
    /// Payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Envelope with the given message.
    pub const fn new(message: &'static str, data: T) -> Self {
        Self {
            code: 200,
            message,
            data,
        }
    }

    /// Envelope for reads.
    pub const fn ok(data: T) -> Self {
        Self::new("success", data)
    }
}

impl ApiResponse<()> {
    /// Envelope with `data: null`.
    pub const fn empty(message: &'static str) -> Self {
        Self::new(message, ())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
