//! Best-effort IP to country lookup.
//!
//! - [`IpApiLocator`] - HTTP lookup against an ip-api.com style endpoint
//! - [`NullLocator`] - Always answers [`UNKNOWN_COUNTRY`]

mod ip_api;

pub use ip_api::IpApiLocator;

use async_trait::async_trait;
use std::net::IpAddr;

use crate::utils::client_ip::is_private_or_local;

/// Country recorded when the lookup is skipped or fails.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Resolves an IP address to a country name.
///
/// Implementations never fail: any error degrades to [`UNKNOWN_COUNTRY`].
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn resolve_country(&self, ip: &str) -> String;
}

/// Returns the parsed address if it is worth sending to a public lookup
/// service. Loopback, private and unparsable inputs return `None`.
pub fn routable_ip(ip: &str) -> Option<IpAddr> {
    ip.trim()
        .parse::<IpAddr>()
        .ok()
        .filter(|addr| !is_private_or_local(addr))
}

/// Locator used when lookups are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLocator;

#[async_trait]
impl GeoLocator for NullLocator {
    async fn resolve_country(&self, _ip: &str) -> String {
        UNKNOWN_COUNTRY.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routable_ip() {
        assert!(routable_ip("8.8.8.8").is_some());
        assert!(routable_ip(" 2001:4860:4860::8888 ").is_some());
        assert!(routable_ip("127.0.0.1").is_none());
        assert!(routable_ip("::1").is_none());
        assert!(routable_ip("192.168.1.20").is_none());
        assert!(routable_ip("localhost").is_none());
        assert!(routable_ip("").is_none());
    }

    #[tokio::test]
    async fn test_null_locator() {
        assert_eq!(NullLocator.resolve_country("8.8.8.8").await, UNKNOWN_COUNTRY);
    }
}
