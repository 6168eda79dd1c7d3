//! Handler for per-link analytics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::dto::link::DataResponse;
use crate::api::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns grouped click counts for one of the caller's links.
///
/// # Endpoint
///
/// `GET /user/links/{slug}/analytics`
///
/// # Response
///
/// ```json
/// {
///   "data": {
///     "total_clicks": 3,
///     "unique_clicks": 1,
///     "by_country": { "US": 2 },
///     "by_referrer": { "google.com": 1 },
///     "utm_breakdown": { "utm_source": { "ads": 1 }, "utm_medium": {}, "utm_campaign": {} },
///     "clicks_by_date": { "2025-03-14": 3 },
///     "device_summary": { "device_type": {}, "platform": {}, "language": {},
///                         "screen_resolution": {}, "timezone": {}, "user_agents": {} }
///   }
/// }
/// ```
///
/// # Errors
///
/// - `404` if the caller owns no link with this slug
pub async fn analytics_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(slug): Path<String>,
) -> Result<Json<DataResponse<AnalyticsResponse>>, AppError> {
    let summary = state.analytics_service.summary_for(user.id, &slug).await?;
    Ok(Json(DataResponse {
        data: summary.into(),
    }))
}
