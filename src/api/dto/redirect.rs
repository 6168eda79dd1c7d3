//! DTOs for the public redirect endpoint.

use serde::{Deserialize, Serialize};

use super::link::UtmFields;
use crate::domain::entities::NewDevice;

/// Request body for `POST /api/redirect/{slug}`, sent by the frontend.
///
/// Every field is optional and defaults to empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RedirectRequest {
    pub device: DeviceInfo,
    pub is_unique: bool,
    pub referrer: String,
    #[serde(rename = "utm_parameters")]
    pub utm_parameters: UtmFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: String,
    pub device_type: String,
    pub language: String,
    pub platform: String,
    pub screen_resolution: String,
    pub timezone: String,
}

impl From<DeviceInfo> for NewDevice {
    fn from(d: DeviceInfo) -> Self {
        Self {
            user_agent: d.user_agent,
            device_type: d.device_type,
            language: d.language,
            platform: d.platform,
            resolution: d.screen_resolution,
            timezone: d.timezone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub original_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redirect_request_wire_names() {
        let req: RedirectRequest = serde_json::from_value(json!({
            "device": {
                "userAgent": "Mozilla/5.0",
                "deviceType": "desktop",
                "screenResolution": "1920x1080"
            },
            "isUnique": true,
            "referrer": "google.com",
            "utm_parameters": { "utm_source": "ads" }
        }))
        .unwrap();

        assert!(req.is_unique);
        assert_eq!(req.referrer, "google.com");
        assert_eq!(req.utm_parameters.utm_source, "ads");

        let device = NewDevice::from(req.device);
        assert_eq!(device.user_agent, "Mozilla/5.0");
        assert_eq!(device.resolution, "1920x1080");
        assert_eq!(device.timezone, "");
    }

    #[test]
    fn test_redirect_request_empty_body() {
        let req: RedirectRequest = serde_json::from_value(json!({})).unwrap();
        assert!(!req.is_unique);
        assert!(req.referrer.is_empty());
    }
}
