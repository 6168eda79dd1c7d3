//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Field names follow the JSON contract of the
//! frontend, which mixes `camelCase` (auth, device) and `snake_case` (links).

pub mod analytics;
pub mod auth;
pub mod health;
pub mod link;
pub mod redirect;
pub mod user;
