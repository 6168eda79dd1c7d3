//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::link::{
    DataResponse, LinkDetails, LinkListItem, ShortenRequest, ShortenResponse, SlugUpdateRequest,
    ToggleResponse, UtmFields,
};
use crate::api::dto::user::SuccessResponse;
use crate::api::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /user/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/landing",
///   "slug": "spring-sale",
///   "utm_source": "newsletter",
///   "utm_medium": "email",
///   "utm_campaign": "spring"
/// }
/// ```
///
/// `slug` and the UTM fields are optional.
///
/// # Errors
///
/// - `400` if the URL or slug is invalid
/// - `409` if the slug is taken
pub async fn shorten_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .shorten(
            user.id,
            &payload.original_url,
            payload.slug,
            payload.utm.into(),
        )
        .await?;

    tracing::info!(user_id = %user.id, slug = %link.slug, "Short link created");

    Ok(Json(ShortenResponse {
        short_url: state.link_service.short_url(&link.slug),
    }))
}

/// `GET /user/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<DataResponse<Vec<LinkListItem>>>, AppError> {
    let links = state.link_service.list(user.id).await?;

    let data = links
        .into_iter()
        .map(|item| {
            let short_url = state.link_service.short_url(&item.link.slug);
            LinkListItem::new(item, short_url)
        })
        .collect();

    Ok(Json(DataResponse { data }))
}

/// `GET /user/links/{slug}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<Json<LinkDetails>, AppError> {
    let link = state.link_service.get(user.id, &slug).await?;
    let short_url = state.link_service.short_url(&link.slug);
    Ok(Json(LinkDetails::new(link, short_url)))
}

/// Deletes a link and its recorded clicks.
///
/// # Endpoint
///
/// `DELETE /user/links/{slug}`
///
/// # Errors
///
/// - `404` if the caller owns no link with this slug
pub async fn delete_link_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.link_service.delete(user.id, &slug).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `PATCH /user/toggle/{slug}`
pub async fn toggle_link_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<Json<ToggleResponse>, AppError> {
    let is_active = state.link_service.toggle(user.id, &slug).await?;
    Ok(Json(ToggleResponse {
        success: true,
        is_active,
    }))
}

/// Replaces the UTM tags of a link. Missing fields are cleared.
///
/// # Endpoint
///
/// `PATCH /user/link/utm/{slug}`
pub async fn update_utm_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(slug): Path<String>,
    Json(payload): Json<UtmFields>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .link_service
        .update_utm(user.id, &slug, payload.into())
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Renames a link.
///
/// # Endpoint
///
/// `PATCH /user/link/{slug}`
///
/// # Errors
///
/// - `400` if the new slug is invalid
/// - `404` if the caller owns no link with this slug
/// - `409` if the new slug is taken
pub async fn update_slug_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(slug): Path<String>,
    Json(payload): Json<SlugUpdateRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .link_service
        .update_slug(user.id, &slug, payload.slug.trim())
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
