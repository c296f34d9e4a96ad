use super::*;
use rstest::rstest;

#[rstest]
#[case(AppError::Unauthorized("test".into()), 401, "UNAUTHORIZED")]
#[case(AppError::NotFound("test".into()), 404, "NOT_FOUND")]
#[case(AppError::Validation("test".into()), 400, "VALIDATION_ERROR")]
#[case(AppError::Conflict("test".into()), 409, "CONFLICT")]
#[case(AppError::ServiceUnavailable("test".into()), 503, "SERVICE_UNAVAILABLE")]
#[case(AppError::Database("test".into()), 500, "DATABASE_ERROR")]
#[case(AppError::Internal("test".into()), 500, "INTERNAL_ERROR")]
fn test_app_error_mapping(#[case] error: AppError, #[case] status: u16, #[case] code: &str) {
    assert_eq!(error.status_code(), status);
    assert_eq!(error.error_code(), code);
    assert_eq!(error.detail(), "test");
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Unauthorized("msg".into())),
        "Authentication failed: msg"
    );
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::ServiceUnavailable("msg".into())),
        "Service unavailable: msg"
    );
    assert_eq!(
        format!("{}", AppError::Conflict("msg".into())),
        "Conflict: msg"
    );
}
