//! Repository trait for short link data access.

use crate::domain::entities::{LinkWithCounts, NewShortLink, ShortLink, Utm};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for managing short links.
///
/// Every `*_owned` operation matches on both slug and owner, so a slug that
/// exists under another user is indistinguishable from a missing one.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by slug regardless of owner. Used by the public redirect.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by slug if it belongs to `user_id`.
    async fn find_owned(&self, user_id: Uuid, slug: &str)
    -> Result<Option<ShortLink>, AppError>;

    /// Lists all links of a user with click counters, newest first.
    async fn list_with_counts(&self, user_id: Uuid) -> Result<Vec<LinkWithCounts>, AppError>;

    /// Deletes a link. Returns `Ok(false)` if no owned link matched.
    async fn delete_owned(&self, user_id: Uuid, slug: &str) -> Result<bool, AppError>;

    /// Flips `is_active`. Returns the new state, or `None` if no owned link matched.
    async fn toggle_owned(&self, user_id: Uuid, slug: &str) -> Result<Option<bool>, AppError>;

    /// Replaces all three UTM fields. Returns `Ok(false)` if no owned link matched.
    async fn update_utm_owned(&self, user_id: Uuid, slug: &str, utm: Utm)
    -> Result<bool, AppError>;

    /// Renames a link. Returns `Ok(false)` if no owned link matched.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if `new_slug` is taken.
    async fn update_slug_owned(
        &self,
        user_id: Uuid,
        slug: &str,
        new_slug: &str,
    ) -> Result<bool, AppError>;

    /// Counts all links in the system.
    async fn count_all(&self) -> Result<i64, AppError>;
}
