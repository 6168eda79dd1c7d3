//! Repository trait for click and device records.

use crate::domain::entities::{ClickWithDevice, NewClick, NewDevice};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for click tracking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Persists a click and its device row atomically.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a
    /// reference to a link that was deleted in the meantime.
    async fn record(&self, click: NewClick, device: NewDevice) -> Result<Uuid, AppError>;

    /// Loads every click of a link joined with its device row.
    async fn analytics_rows(&self, link_id: Uuid) -> Result<Vec<ClickWithDevice>, AppError>;

    /// Counts all recorded clicks.
    async fn count_all(&self) -> Result<i64, AppError>;
}
