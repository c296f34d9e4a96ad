//! Authentication routes: register, login, profile.

use axum::{
    Router,
    extract::State,
    routing::{get, post, put},
};
use serde::Deserialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::ValidatedJson,
    middleware::AuthUser,
    response::ApiResponse,
};
use tripwise_core::auth::{
    NewUser, PasswordError, User, UserPatch, hash_password, needs_rehash, verify_password,
};
use tripwise_core::store::TravelStore;
use tripwise_shared::AppError;
use tripwise_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/update", put(update_profile))
        .route("/auth/change-password", put(change_password))
}

/// Profile fields a user may change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New username.
    #[validate(length(min = 1, max = 50, message = "must be 1-50 characters"))]
    pub username: Option<String>,
    /// New phone number.
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub phone: Option<String>,
    /// New avatar URL.
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub avatar: Option<String>,
}

/// Password change payload.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[validate(length(min = 1, message = "is required"))]
    pub old_password: String,
    /// Replacement password.
    #[validate(length(min = 6, max = 128, message = "must be 6-128 characters"))]
    pub new_password: String,
}

fn password_failure(err: &PasswordError) -> ApiError {
    error!(error = %err, "Password hashing failed");
    ApiError(AppError::Internal("Password processing failed".into()))
}

/// Re-hashes a correct password whose stored hash uses outdated parameters.
/// Failures are logged and do not block the login.
async fn upgrade_hash(store: &dyn TravelStore, user: &User, password: &str) {
    if !needs_rehash(&user.hashed_password) {
        return;
    }
    let patch = match hash_password(password) {
        Ok(hashed) => UserPatch {
            hashed_password: Some(hashed),
            ..UserPatch::default()
        },
        Err(e) => {
            warn!(user_id = %user.id, error = %e, "Could not re-hash password");
            return;
        }
    };
    match store.update_user(user.id, patch).await {
        Ok(_) => info!(user_id = %user.id, "Password hash upgraded"),
        Err(e) => warn!(user_id = %user.id, error = %e, "Could not store upgraded hash"),
    }
}

/// POST /api/auth/register - Create an account.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> ApiResult<ApiResponse<UserInfo>> {
    let store = state.store.get()?;
    let email = payload.email.trim().to_lowercase();

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError(AppError::Conflict("Email is already registered".into())));
    }
    if store.find_user_by_username(&payload.username).await?.is_some() {
        return Err(ApiError(AppError::Conflict("Username is already taken".into())));
    }

    let hashed_password = hash_password(&payload.password).map_err(|e| password_failure(&e))?;
    let user = store
        .create_user(NewUser {
            email,
            username: payload.username,
            hashed_password,
            phone: payload.phone,
        })
        .await?;

    info!(user_id = %user.id, "User registered");
    Ok(ApiResponse::new("Registration successful", user.info()))
}

/// POST /api/auth/login - Exchange credentials for an access token.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let store = state.store.get()?;
    let invalid = || ApiError(AppError::Unauthorized("Invalid email or password".into()));

    let email = payload.email.trim().to_lowercase();
    let Some(user) = store.find_user_by_email(&email).await? else {
        info!("Login attempt for unknown email");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.hashed_password)
        .map_err(|e| password_failure(&e))?
    {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid());
    }

    upgrade_hash(store, &user, &payload.password).await;

    let access_token = state
        .jwt_service
        .generate_access_token(user.id)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            ApiError(AppError::Internal("Could not issue token".into()))
        })?;

    info!(user_id = %user.id, "User logged in");
    Ok(ApiResponse::new(
        "Login successful",
        LoginResponse::bearer(
            access_token,
            state.jwt_service.access_token_expires_in(),
            user.info(),
        ),
    ))
}

/// GET /api/auth/me - Current account.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<ApiResponse<UserInfo>> {
    let user = state
        .store
        .get()?
        .find_user_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("User not found".into())))?;
    Ok(ApiResponse::ok(user.info()))
}

/// PUT /api/auth/update - Change username, phone or avatar.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<ApiResponse<UserInfo>> {
    let patch = UserPatch {
        username: payload.username,
        phone: payload.phone,
        avatar: payload.avatar,
        hashed_password: None,
    };
    if patch.is_empty() {
        return Err(ApiError(AppError::Validation("No updatable fields provided".into())));
    }

    let user = state
        .store
        .get()?
        .update_user(auth.user_id(), patch)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("User not found".into())))?;

    info!(user_id = %user.id, "Profile updated");
    Ok(ApiResponse::new("Profile updated", user.info()))
}

/// PUT /api/auth/change-password - Replace the password after checking the old one.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<()>> {
    let store = state.store.get()?;
    let user = store
        .find_user_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("User not found".into())))?;

    if !verify_password(&payload.old_password, &user.hashed_password)
        .map_err(|e| password_failure(&e))?
    {
        return Err(ApiError(AppError::Validation("Old password is incorrect".into())));
    }

    let hashed_password =
        hash_password(&payload.new_password).map_err(|e| password_failure(&e))?;
    store
        .update_user(
            user.id,
            UserPatch {
                hashed_password: Some(hashed_password),
                ..UserPatch::default()
            },
        )
        .await?;

    info!(user_id = %user.id, "Password changed");
    Ok(ApiResponse::empty("Password changed"))
}
