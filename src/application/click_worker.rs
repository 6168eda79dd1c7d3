//! Background recording of redirect clicks.
//!
//! The redirect handler pushes [`ClickEvent`]s onto a bounded channel;
//! [`run_click_worker`] drains it and records each event on its own task,
//! bounded by a semaphore and a per-event timeout. Failures are logged and
//! counted, never propagated.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use uuid::Uuid;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;
use crate::infrastructure::geo::{GeoLocator, UNKNOWN_COUNTRY};

/// Retries after the first failed insert.
const MAX_RETRIES: usize = 2;

/// Resolves the country of a click and persists it.
pub struct ClickRecorder {
    clicks: Arc<dyn ClickRepository>,
    geo: Arc<dyn GeoLocator>,
}

impl ClickRecorder {
    pub fn new(clicks: Arc<dyn ClickRepository>, geo: Arc<dyn GeoLocator>) -> Self {
        Self { clicks, geo }
    }

    /// Records one click and its device row.
    ///
    /// Internal (database) errors are retried with exponential backoff; other
    /// errors are returned immediately.
    pub async fn record(&self, event: ClickEvent) -> Result<Uuid, AppError> {
        let country = match event.ip.as_deref() {
            Some(ip) => self.geo.resolve_country(ip).await,
            None => UNKNOWN_COUNTRY.to_string(),
        };

        let click = NewClick {
            link_id: event.link_id,
            ip_address: event.ip.unwrap_or_default(),
            country,
            referrer: event.referrer,
            is_unique: event.is_unique,
            utm: event.utm,
        };
        let device = event.device;

        let strategy = ExponentialBackoff::from_millis(2)
            .factor(25)
            .max_delay(Duration::from_millis(500))
            .map(jitter)
            .take(MAX_RETRIES);

        RetryIf::spawn(
            strategy,
            || self.clicks.record(click.clone(), device.clone()),
            |e: &AppError| {
                let retry = matches!(e, AppError::Internal { .. });
                if retry {
                    tracing::debug!(error = %e, "Retrying click insert");
                }
                retry
            },
        )
        .await
    }
}

/// Drains `rx` until every sender is dropped, then waits for in-flight
/// recordings to finish.
///
/// At most `concurrency` events are processed at once; each is abandoned
/// after `timeout`.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<ClickRecorder>,
    concurrency: usize,
    timeout: Duration,
) {
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let recorder = recorder.clone();

        tokio::spawn(async move {
            let _permit = permit;
            let link_id = event.link_id;

            match tokio::time::timeout(timeout, recorder.record(event)).await {
                Ok(Ok(click_id)) => {
                    metrics::counter!("click_events_total", "outcome" => "recorded").increment(1);
                    tracing::debug!(%link_id, %click_id, "Click recorded");
                }
                Ok(Err(e)) => {
                    metrics::counter!("click_events_total", "outcome" => "failed").increment(1);
                    tracing::warn!(%link_id, error = %e, "Failed to record click");
                }
                Err(_) => {
                    metrics::counter!("click_events_total", "outcome" => "timed_out").increment(1);
                    tracing::warn!(%link_id, ?timeout, "Click recording timed out");
                }
            }
        });
    }

    let _ = semaphore.acquire_many(concurrency as u32).await;
    tracing::info!("Click worker stopped");
}
