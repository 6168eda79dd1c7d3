//! Click and device records captured on redirect.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::link::Utm;

/// Input data for a click row.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: Uuid,
    pub ip_address: String,
    pub country: String,
    pub referrer: String,
    pub is_unique: bool,
    pub utm: Utm,
}

/// Client device details reported by the frontend. Stored 1:1 with a click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDevice {
    pub user_agent: String,
    pub device_type: String,
    pub language: String,
    pub platform: String,
    pub resolution: String,
    pub timezone: String,
}

/// A click joined with its device row, the input of analytics aggregation.
///
/// Device fields are empty strings when no device row exists.
#[derive(Debug, Clone, Default)]
pub struct ClickWithDevice {
    pub is_unique: bool,
    pub country: String,
    pub referrer: String,
    pub utm: Utm,
    pub created_at: DateTime<Utc>,
    pub device: NewDevice,
}
