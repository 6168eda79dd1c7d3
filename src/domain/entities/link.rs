//! Short link entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Marketing attribution tags. An empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utm {
    pub source: String,
    pub medium: String,
    pub campaign: String,
}

impl Utm {
    pub fn new(
        source: impl Into<String>,
        medium: impl Into<String>,
        campaign: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            medium: medium.into(),
            campaign: campaign.into(),
        }
    }
}

/// A short link owned by a user.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slug: String,
    pub original_url: String,
    pub utm: Utm,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub user_id: Uuid,
    pub slug: String,
    pub original_url: String,
    pub utm: Utm,
}

/// A link together with its click counters, as listed on the dashboard.
#[derive(Debug, Clone)]
pub struct LinkWithCounts {
    pub link: ShortLink,
    pub total_clicks: i64,
    pub unique_clicks: i64,
}
