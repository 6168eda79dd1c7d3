//! Bearer token authentication extractor.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::domain::entities::User;
use crate::{error::AppError, state::AppState};

/// The user resolved from `Authorization: Bearer <access token>`.
///
/// Taking this as a handler argument is what makes a route protected: the
/// handler body never runs unless
/// [`AuthService::authenticate`](crate::application::services::AuthService::authenticate)
/// succeeded.
///
/// # Errors
///
/// Rejects with `401 Unauthorized` (and `WWW-Authenticate: Bearer`) if:
/// - the header is missing or not exactly `Bearer <token>`
/// - the token is not a valid access token (code `token_expired` when expired)
/// - the referenced user no longer exists
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserInfo> {
///     Json(user.into())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user = state.auth_service.authenticate(header).await?;
        Ok(Self(user))
    }
}
