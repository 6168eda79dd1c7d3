//! Handlers for the caller's own profile.

use axum::{Json, extract::State};

use crate::api::dto::user::{ProfileUpdateRequest, SuccessResponse, UserInfo};
use crate::api::middleware::AuthenticatedUser;
use crate::application::services::user_service::ProfileUpdate;
use crate::error::AppError;
use crate::state::AppState;

/// `POST /user/profile`
pub async fn profile_handler(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserInfo> {
    Json(user.into())
}

/// Updates one profile field.
///
/// # Endpoint
///
/// `PATCH /user/update`
///
/// # Request Body
///
/// ```json
/// { "type": "name", "value": "Ada Lovelace" }
/// ```
///
/// # Errors
///
/// - `400` for an unknown `type` or an invalid value
/// - `409` if the new email is already registered
pub async fn update_profile_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let update = ProfileUpdate::from_parts(&payload.kind, payload.value)?;
    state.user_service.update_profile(user.id, update).await?;
    Ok(Json(SuccessResponse::ok()))
}
