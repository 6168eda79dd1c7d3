//! Per-link click analytics.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsSummary, aggregate};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Service producing [`AnalyticsSummary`] values for a user's links.
pub struct AnalyticsService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Aggregates every recorded click of an owned link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner has no link with this slug.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn summary_for(&self, owner: Uuid, slug: &str) -> Result<AnalyticsSummary, AppError> {
        let link = self
            .links
            .find_owned(owner, slug)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "slug": slug })))?;

        let rows = self.clicks.analytics_rows(link.id).await?;
        Ok(aggregate(&rows))
    }
}
