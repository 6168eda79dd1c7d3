//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{ClickWithDevice, NewClick, NewDevice, Utm};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct AnalyticsRow {
    is_unique: bool,
    country: String,
    referrer: String,
    utm_source: String,
    utm_medium: String,
    utm_campaign: String,
    created_at: DateTime<Utc>,
    user_agent: String,
    device_type: String,
    language: String,
    platform: String,
    resolution: String,
    timezone: String,
}

impl From<AnalyticsRow> for ClickWithDevice {
    fn from(row: AnalyticsRow) -> Self {
        Self {
            is_unique: row.is_unique,
            country: row.country,
            referrer: row.referrer,
            utm: Utm::new(row.utm_source, row.utm_medium, row.utm_campaign),
            created_at: row.created_at,
            device: NewDevice {
                user_agent: row.user_agent,
                device_type: row.device_type,
                language: row.language,
                platform: row.platform,
                resolution: row.resolution,
                timezone: row.timezone,
            },
        }
    }
}

/// PostgreSQL repository for clicks and their device rows.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, click: NewClick, device: NewDevice) -> Result<Uuid, AppError> {
        let mut tx = self.pool.begin().await?;

        let click_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO clicks (
                short_link_id, ip_address, country, referrer, is_unique,
                utm_source, utm_medium, utm_campaign
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(click.link_id)
        .bind(&click.ip_address)
        .bind(&click.country)
        .bind(&click.referrer)
        .bind(click.is_unique)
        .bind(&click.utm.source)
        .bind(&click.utm.medium)
        .bind(&click.utm.campaign)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO devices (
                click_id, user_agent, device_type, language, platform, resolution, timezone
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(click_id)
        .bind(&device.user_agent)
        .bind(&device.device_type)
        .bind(&device.language)
        .bind(&device.platform)
        .bind(&device.resolution)
        .bind(&device.timezone)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(click_id)
    }

    async fn analytics_rows(&self, link_id: Uuid) -> Result<Vec<ClickWithDevice>, AppError> {
        let rows = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            SELECT
                c.is_unique, c.country, c.referrer,
                c.utm_source, c.utm_medium, c.utm_campaign, c.created_at,
                COALESCE(d.user_agent, '') AS user_agent,
                COALESCE(d.device_type, '') AS device_type,
                COALESCE(d.language, '') AS language,
                COALESCE(d.platform, '') AS platform,
                COALESCE(d.resolution, '') AS resolution,
                COALESCE(d.timezone, '') AS timezone
            FROM clicks c
            LEFT JOIN devices d ON d.click_id = c.id
            WHERE c.short_link_id = $1
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
