//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use tripwise_core::expense::ExpenseError;
use tripwise_core::plan::PlanError;
use tripwise_core::store::StoreError;
use tripwise_core::voice::SpeechError;
use tripwise_shared::AppError;
use validator::ValidationErrors;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler error rendered as `{code, error, message, data: null}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (
            status,
            Json(json!({
                "code": status.as_u16(),
                "error": self.0.error_code(),
                "message": self.0.detail(),
                "data": null,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err.into())
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        Self(err.into())
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        Self(err.into())
    }
}

impl From<SpeechError> for ApiError {
    fn from(err: SpeechError) -> Self {
        Self(err.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self(AppError::Validation(describe_validation(&errors)))
    }
}

/// Flattens field errors into `field: message; field: message`.
fn describe_validation(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "is required"))]
        name: String,
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError(AppError::NotFound("Travel plan not found".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], 404);
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Travel plan not found");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_validation_errors_are_400() {
        let errors = Sample { name: String::new() }.validate().unwrap_err();
        let ApiError(err) = ApiError::from(errors);

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.detail(), "name: is required");
    }
}
