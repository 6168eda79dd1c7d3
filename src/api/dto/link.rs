//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::domain::entities::{LinkWithCounts, ShortLink, Utm};

/// Request body for `POST /user/shorten`.
///
/// An absent, `null` or empty `slug` asks for a generated one.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(flatten)]
    pub utm: UtmFields,
}

/// The three UTM tags as they appear on the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UtmFields {
    #[serde(default)]
    pub utm_source: String,
    #[serde(default)]
    pub utm_medium: String,
    #[serde(default)]
    pub utm_campaign: String,
}

impl From<UtmFields> for Utm {
    fn from(f: UtmFields) -> Self {
        Utm::new(f.utm_source, f.utm_medium, f.utm_campaign)
    }
}

impl From<Utm> for UtmFields {
    fn from(utm: Utm) -> Self {
        Self {
            utm_source: utm.source,
            utm_medium: utm.medium,
            utm_campaign: utm.campaign,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

/// Link as returned by `GET /user/links/{slug}`.
#[derive(Debug, Serialize)]
pub struct LinkDetails {
    pub slug: String,
    pub original_url: String,
    pub short_url: String,
    #[serde(flatten)]
    pub utm: UtmFields,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkDetails {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            slug: link.slug,
            original_url: link.original_url,
            short_url,
            utm: link.utm.into(),
            is_active: link.is_active,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Entry of `GET /user/links`.
#[derive(Debug, Serialize)]
pub struct LinkListItem {
    #[serde(flatten)]
    pub link: LinkDetails,
    pub total_clicks: i64,
    pub unique_clicks: i64,
}

impl LinkListItem {
    pub fn new(item: LinkWithCounts, short_url: String) -> Self {
        Self {
            link: LinkDetails::new(item.link, short_url),
            total_clicks: item.total_clicks,
            unique_clicks: item.unique_clicks,
        }
    }
}

/// `{ "data": ... }` envelope used by list and analytics responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Request body for `PATCH /user/link/{slug}`.
#[derive(Debug, Deserialize)]
pub struct SlugUpdateRequest {
    pub slug: String,
}

/// Response of `PATCH /user/toggle/{slug}`.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub is_active: bool,
}
