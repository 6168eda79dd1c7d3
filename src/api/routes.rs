//! API route configuration.
//!
//! Protected handlers take [`crate::api::middleware::AuthenticatedUser`]
//! as an argument, so authentication is enforced per handler rather than by
//! a router layer.

use crate::api::handlers::{
    analytics_handler, delete_link_handler, get_link_handler, list_links_handler, login_handler,
    logout_handler, profile_handler, redirect_handler, register_handler, renew_handler,
    shorten_handler, toggle_link_handler, update_profile_handler, update_slug_handler,
    update_utm_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Public authentication routes, nested under `/auth`.
///
/// - `POST /register`     - Create an account
/// - `POST /login`        - Sign in
/// - `POST /token/renew`  - Rotate the refresh token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/token/renew", post(renew_handler))
}

/// Routes of the signed-in user, nested under `/user`. All require a bearer
/// access token.
///
/// - `POST   /profile`                - Current user
/// - `PATCH  /update`                 - Change email, name or password
/// - `GET    /links`                  - List links with click counters
/// - `POST   /shorten`                - Create a link
/// - `GET    /links/{slug}`           - Link details
/// - `DELETE /links/{slug}`           - Delete a link
/// - `GET    /links/{slug}/analytics` - Click analytics
/// - `PATCH  /toggle/{slug}`          - Enable/disable a link
/// - `PATCH  /link/utm/{slug}`        - Replace UTM tags
/// - `PATCH  /link/{slug}`            - Rename a link
/// - `POST   /logout`                 - Revoke the refresh token
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(profile_handler))
        .route("/update", patch(update_profile_handler))
        .route("/links", get(list_links_handler))
        .route("/shorten", post(shorten_handler))
        .route(
            "/links/{slug}",
            get(get_link_handler).delete(delete_link_handler),
        )
        .route("/links/{slug}/analytics", get(analytics_handler))
        .route("/toggle/{slug}", patch(toggle_link_handler))
        .route("/link/utm/{slug}", patch(update_utm_handler))
        .route("/link/{slug}", patch(update_slug_handler))
        .route("/logout", post(logout_handler))
}

/// Public API routes, nested under `/api`.
///
/// - `POST /redirect/{slug}` - Resolve a slug and record the click
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/redirect/{slug}", post(redirect_handler))
}
