//! Request extractors and middleware.
//!
//! Provides authentication and observability.

pub mod auth;
pub mod tracing;

pub use auth::AuthenticatedUser;
