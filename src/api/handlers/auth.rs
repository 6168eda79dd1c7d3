//! Handlers for registration, login, token renewal and logout.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, LoginRequest, RegisterRequest, RenewRequest, TokenResponse,
};
use crate::api::dto::user::SuccessResponse;
use crate::api::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account and signs it in.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Errors
///
/// - `400` if name, email or password fail validation
/// - `409` if the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let session = state.auth_service.register(payload.into()).await?;

    Ok(Json(session.into()))
}

/// Signs in with email and password.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// - `401` for an unknown email or a wrong password (same body for both)
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .login(payload.email.trim(), &payload.password)
        .await?;

    Ok(Json(session.into()))
}

/// Exchanges a refresh token for a new access/refresh pair.
///
/// # Endpoint
///
/// `POST /auth/token/renew`
///
/// # Errors
///
/// - `401` with code `token_expired` if the refresh token expired
/// - `401` if it is invalid, already used or logged out
pub async fn renew_handler(
    State(state): State<AppState>,
    Json(payload): Json<RenewRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let pair = state.auth_service.renew(&payload.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// Revokes the caller's refresh token.
///
/// # Endpoint
///
/// `POST /user/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<SuccessResponse>, AppError> {
    state.auth_service.logout(user.id).await?;
    tracing::info!(user_id = %user.id, "User logged out");
    Ok(Json(SuccessResponse::ok()))
}
