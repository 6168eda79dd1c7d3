//! Click analytics aggregation.
//!
//! [`aggregate`] folds joined click/device rows into frequency maps in a
//! single pass. The fold is order-independent and never allocates a map
//! lazily: every map exists (possibly empty) in the returned summary.

use std::collections::BTreeMap;

use crate::domain::entities::ClickWithDevice;

/// Value → number of clicks carrying that value.
pub type Frequency = BTreeMap<String, u64>;

/// Per-tag counts for the three UTM parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtmBreakdown {
    pub source: Frequency,
    pub medium: Frequency,
    pub campaign: Frequency,
}

/// Per-attribute counts for the reporting device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSummary {
    pub device_type: Frequency,
    pub platform: Frequency,
    pub language: Frequency,
    pub resolution: Frequency,
    pub timezone: Frequency,
    pub user_agent: Frequency,
}

/// Grouped click counts for one link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_clicks: u64,
    pub unique_clicks: u64,
    pub by_country: Frequency,
    pub by_referrer: Frequency,
    pub utm_breakdown: UtmBreakdown,
    /// Keyed by UTC calendar day, `YYYY-MM-DD`.
    pub clicks_by_date: Frequency,
    pub device_summary: DeviceSummary,
}

/// Increments `key` unless it is empty.
fn bump(map: &mut Frequency, key: &str) {
    if key.is_empty() {
        return;
    }
    *map.entry(key.to_owned()).or_insert(0) += 1;
}

impl AnalyticsSummary {
    /// Adds a single row to the summary.
    pub fn record(&mut self, row: &ClickWithDevice) {
        self.total_clicks += 1;
        if row.is_unique {
            self.unique_clicks += 1;
        }

        bump(&mut self.by_country, &row.country);
        bump(&mut self.by_referrer, &row.referrer);

        let day = row.created_at.format("%Y-%m-%d").to_string();
        bump(&mut self.clicks_by_date, &day);

        bump(&mut self.utm_breakdown.source, &row.utm.source);
        bump(&mut self.utm_breakdown.medium, &row.utm.medium);
        bump(&mut self.utm_breakdown.campaign, &row.utm.campaign);

        let device = &row.device;
        let summary = &mut self.device_summary;
        bump(&mut summary.device_type, &device.device_type);
        bump(&mut summary.platform, &device.platform);
        bump(&mut summary.language, &device.language);
        bump(&mut summary.resolution, &device.resolution);
        bump(&mut summary.timezone, &device.timezone);
        bump(&mut summary.user_agent, &device.user_agent);
    }
}

/// Aggregates click rows into an [`AnalyticsSummary`].
pub fn aggregate<'a, I>(rows: I) -> AnalyticsSummary
where
    I: IntoIterator<Item = &'a ClickWithDevice>,
{
    rows.into_iter()
        .fold(AnalyticsSummary::default(), |mut summary, row| {
            summary.record(row);
            summary
        })
}
