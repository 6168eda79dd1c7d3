//! Handler for resolving a slug on behalf of the frontend.

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
};
use std::net::SocketAddr;
use tokio::sync::mpsc::error::TrySendError;

use crate::api::dto::redirect::{RedirectRequest, RedirectResponse};
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Resolves a slug to its destination and queues a click.
///
/// # Endpoint
///
/// `POST /api/redirect/{slug}`
///
/// # Request Flow
///
/// 1. Look up the link by slug (any owner)
/// 2. Inactive link: `405` with an empty `original_url`, no click recorded
/// 3. Queue a [`ClickEvent`] with `try_send`; a full queue drops the click
/// 4. Return `{ "original_url": ... }`
///
/// # Errors
///
/// - `404` if the slug does not exist
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<RedirectRequest>,
) -> Result<(StatusCode, Json<RedirectResponse>), AppError> {
    let link = state.link_service.resolve(&slug).await?;

    if !link.is_active {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            Json(RedirectResponse {
                original_url: String::new(),
            }),
        ));
    }

    let ip = client_ip(&headers, Some(peer), state.behind_proxy);
    let event = ClickEvent::new(link.id, ip)
        .with_referrer(payload.referrer)
        .with_unique(payload.is_unique)
        .with_utm(payload.utm_parameters.into())
        .with_device(payload.device.into());

    match state.click_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            metrics::counter!("click_events_total", "outcome" => "dropped").increment(1);
            tracing::warn!(%slug, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::error!(%slug, "Click queue closed, dropping click");
        }
    }

    Ok((
        StatusCode::OK,
        Json(RedirectResponse {
            original_url: link.original_url,
        }),
    ))
}
