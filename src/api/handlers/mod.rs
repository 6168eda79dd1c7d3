//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod links;
pub mod profile;
pub mod redirect;

pub use analytics::analytics_handler;
pub use auth::{login_handler, logout_handler, register_handler, renew_handler};
pub use health::health_handler;
pub use links::{
    delete_link_handler, get_link_handler, list_links_handler, shorten_handler,
    toggle_link_handler, update_slug_handler, update_utm_handler,
};
pub use profile::{profile_handler, update_profile_handler};
pub use redirect::redirect_handler;
