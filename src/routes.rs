//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`, `GET /check` - Health check: DB, click queue (public)
//! - `/auth/*`                    - Register, login, token renewal (public)
//! - `/user/*`                    - Profile and link management (bearer token)
//! - `/api/redirect/{slug}`       - Slug resolution for the frontend (public)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Only the configured frontend origin
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use anyhow::Context;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the CORS policy for the frontend at `origin`.
///
/// # Errors
///
/// Returns an error if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin.trim_end_matches('/'))
        .with_context(|| format!("Invalid FRONTEND_ORIGIN: {origin}"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

/// Builds the routes and middleware without path normalization.
pub fn api_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/check", get(health_handler))
        .nest("/auth", api::routes::auth_routes())
        .nest("/user", api::routes::user_routes())
        .nest("/api", api::routes::public_routes())
        .with_state(state)
        .layer(cors)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, cors: CorsLayer) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state, cors))
}
