//! Wire representation of [`AnalyticsSummary`].

use serde::Serialize;

use crate::domain::analytics::{AnalyticsSummary, DeviceSummary, Frequency, UtmBreakdown};

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total_clicks: u64,
    pub unique_clicks: u64,
    pub by_country: Frequency,
    pub by_referrer: Frequency,
    pub utm_breakdown: UtmBreakdownResponse,
    pub clicks_by_date: Frequency,
    pub device_summary: DeviceSummaryResponse,
}

#[derive(Debug, Serialize)]
pub struct UtmBreakdownResponse {
    pub utm_source: Frequency,
    pub utm_medium: Frequency,
    pub utm_campaign: Frequency,
}

#[derive(Debug, Serialize)]
pub struct DeviceSummaryResponse {
    pub device_type: Frequency,
    pub platform: Frequency,
    pub language: Frequency,
    pub screen_resolution: Frequency,
    pub timezone: Frequency,
    pub user_agents: Frequency,
}

impl From<UtmBreakdown> for UtmBreakdownResponse {
    fn from(b: UtmBreakdown) -> Self {
        Self {
            utm_source: b.source,
            utm_medium: b.medium,
            utm_campaign: b.campaign,
        }
    }
}

impl From<DeviceSummary> for DeviceSummaryResponse {
    fn from(d: DeviceSummary) -> Self {
        Self {
            device_type: d.device_type,
            platform: d.platform,
            language: d.language,
            screen_resolution: d.resolution,
            timezone: d.timezone,
            user_agents: d.user_agent,
        }
    }
}

impl From<AnalyticsSummary> for AnalyticsResponse {
    fn from(s: AnalyticsSummary) -> Self {
        Self {
            total_clicks: s.total_clicks,
            unique_clicks: s.unique_clicks,
            by_country: s.by_country,
            by_referrer: s.by_referrer,
            utm_breakdown: s.utm_breakdown.into(),
            clicks_by_date: s.clicks_by_date,
            device_summary: s.device_summary.into(),
        }
    }
}
