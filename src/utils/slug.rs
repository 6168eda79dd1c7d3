//! Slug generation and validation.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Length of generated slugs.
pub const SLUG_LENGTH: usize = 6;

const SLUG_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const MIN_CUSTOM_LEN: usize = 3;
const MAX_CUSTOM_LEN: usize = 50;

/// Slugs that would shadow a route of the frontend or the API.
const RESERVED_SLUGS: &[&str] = &[
    "api", "auth", "user", "users", "admin", "health", "check", "login", "register", "logout",
    "dashboard", "static",
];

/// Generates a random lowercase alphanumeric slug of [`SLUG_LENGTH`] chars.
pub fn generate_slug() -> String {
    let mut rng = rand::rng();
    (0..SLUG_LENGTH)
        .map(|_| SLUG_ALPHABET[rng.random_range(0..SLUG_ALPHABET.len())] as char)
        .collect()
}

/// Validates a user-chosen slug.
///
/// # Rules
///
/// - Length: 3-50 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Not a reserved word (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() < MIN_CUSTOM_LEN || slug.len() > MAX_CUSTOM_LEN {
        return Err(AppError::bad_request(
            "Slug must be 3-50 characters",
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Slug can only contain letters, digits, hyphens and underscores",
            json!({ "slug": slug }),
        ));
    }

    let lowered = slug.to_ascii_lowercase();
    if RESERVED_SLUGS.contains(&lowered.as_str()) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}
