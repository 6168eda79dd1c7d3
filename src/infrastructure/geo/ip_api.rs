//! ip-api.com compatible HTTP locator.

use std::time::Duration;

use async_trait::async_trait;
use ureq::Agent;

use super::{GeoLocator, UNKNOWN_COUNTRY, routable_ip};

const HTTP_TIMEOUT_SECS: u64 = 2;

/// Looks up countries over HTTP with a blocking `ureq` agent run on the
/// blocking pool.
///
/// The URL template uses `{ip}` as placeholder, e.g.
/// `http://ip-api.com/json/{ip}?fields=status,country`.
pub struct IpApiLocator {
    url_template: String,
    agent: Agent,
}

impl IpApiLocator {
    pub fn new(url_template: impl Into<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into();

        Self {
            url_template: url_template.into(),
            agent,
        }
    }

    fn fetch_country(agent: &Agent, url: &str) -> Option<String> {
        let response = match agent.get(url).call() {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(%url, error = %e, "GeoIP request failed");
                return None;
            }
        };

        let body: serde_json::Value = match response.into_body().read_json() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(%url, error = %e, "GeoIP response parse failed");
                return None;
            }
        };

        country_from_response(&body)
    }
}

/// Extracts the country from an ip-api.com response body.
fn country_from_response(body: &serde_json::Value) -> Option<String> {
    if body["status"].as_str() != Some("success") {
        return None;
    }
    body["country"]
        .as_str()
        .filter(|c| !c.is_empty())
        .map(String::from)
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    async fn resolve_country(&self, ip: &str) -> String {
        let Some(addr) = routable_ip(ip) else {
            return UNKNOWN_COUNTRY.to_string();
        };

        let url = self.url_template.replace("{ip}", &addr.to_string());
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || Self::fetch_country(&agent, &url))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "GeoIP lookup task failed");
                None
            })
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    }
}
