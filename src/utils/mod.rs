//! Helpers shared across layers.
//!
//! - [`client_ip`] - Client address resolution behind an optional proxy
//! - [`password`] - Argon2 hashing
//! - [`slug`] - Slug generation and custom slug rules
//! - [`url_normalizer`] - Destination URL validation

pub mod client_ip;
pub mod password;
pub mod slug;
pub mod url_normalizer;
