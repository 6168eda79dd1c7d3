//! Click event model for asynchronous click recording.

use uuid::Uuid;

use crate::domain::entities::{NewDevice, Utm};

/// An in-memory click captured by the redirect handler.
///
/// Handed to the background worker over a channel so the redirect response
/// never waits for geolocation or database writes. Converted into
/// [`crate::domain::entities::NewClick`] and [`NewDevice`] once the country
/// has been resolved.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: Uuid,
    /// Client address as seen by the server, if it could be determined.
    pub ip: Option<String>,
    pub referrer: String,
    pub is_unique: bool,
    pub utm: Utm,
    pub device: NewDevice,
}

impl ClickEvent {
    /// Creates a click event with empty attribution and device data.
    pub fn new(link_id: Uuid, ip: Option<String>) -> Self {
        Self {
            link_id,
            ip,
            referrer: String::new(),
            is_unique: false,
            utm: Utm::default(),
            device: NewDevice::default(),
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn with_unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    pub fn with_utm(mut self, utm: Utm) -> Self {
        self.utm = utm;
        self
    }

    pub fn with_device(mut self, device: NewDevice) -> Self {
        self.device = device;
        self
    }
}
