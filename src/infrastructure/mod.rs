//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and geolocation.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`geo`] - IP geolocation lookups

pub mod geo;
pub mod persistence;
