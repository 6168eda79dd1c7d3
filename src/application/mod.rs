//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login, renewal and the bearer gate
//! - [`services::token_service::TokenService`] - JWT issuing and verification
//! - [`services::user_service::UserService`] - Profile updates
//! - [`services::link_service::LinkService`] - Short link registry
//! - [`services::analytics_service::AnalyticsService`] - Per-link click analytics
//! - [`click_worker`] - Asynchronous click recording

pub mod click_worker;
pub mod services;
