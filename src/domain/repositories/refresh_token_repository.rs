//! Repository trait for refresh credentials.

use crate::domain::entities::RefreshCredential;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for the one-per-user refresh credential.
///
/// Only token digests are passed in and out; raw tokens never reach storage.
/// The unique constraint on `user_id` is what keeps a user at zero or one
/// credential, so every write here relies on it instead of in-process locks.
/// The first credential is inserted by [`super::UserRepository::create`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRefreshTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Inserts a credential or replaces the existing one in a single statement.
    async fn upsert(&self, user_id: Uuid, token_hash: &str) -> Result<(), AppError>;

    /// Finds the credential whose digest equals `token_hash`.
    async fn find_by_token(&self, token_hash: &str)
    -> Result<Option<RefreshCredential>, AppError>;

    /// Replaces `old_hash` with `new_hash` for `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the stored digest was `old_hash` and has been replaced
    /// - `Ok(false)` if the credential was already rotated or deleted
    async fn rotate(&self, user_id: Uuid, old_hash: &str, new_hash: &str)
    -> Result<bool, AppError>;

    /// Deletes the credential of a user. Deleting a missing row is not an error.
    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), AppError>;
}
