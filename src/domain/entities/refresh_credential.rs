//! Stored refresh credential.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The single live refresh credential of a user.
///
/// Only the HMAC digest of the token is persisted; the expiry lives inside
/// the signed token itself.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshCredential {
    pub id: i64,
    pub user_id: Uuid,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
