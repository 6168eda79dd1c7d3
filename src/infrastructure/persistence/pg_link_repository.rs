//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{LinkWithCounts, NewShortLink, ShortLink, Utm};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    user_id: Uuid,
    slug: String,
    original_url: String,
    utm_source: String,
    utm_medium: String,
    utm_campaign: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(row: LinkRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            slug: row.slug,
            original_url: row.original_url,
            utm: Utm::new(row.utm_source, row.utm_medium, row.utm_campaign),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkCountsRow {
    #[sqlx(flatten)]
    link: LinkRow,
    total_clicks: i64,
    unique_clicks: i64,
}

const LINK_COLUMNS: &str = "id, user_id, slug, original_url, utm_source, utm_medium, \
                            utm_campaign, is_active, created_at, updated_at";

/// PostgreSQL repository for short links.
///
/// Slug uniqueness is enforced by `short_links_slug_key`; a violation surfaces
/// as [`AppError::Conflict`] through `From<sqlx::Error>`.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let sql = format!(
            r#"
            INSERT INTO short_links (user_id, slug, original_url, utm_source, utm_medium, utm_campaign)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(new_link.user_id)
            .bind(&new_link.slug)
            .bind(&new_link.original_url)
            .bind(&new_link.utm.source)
            .bind(&new_link.utm.medium)
            .bind(&new_link.utm.campaign)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM short_links WHERE slug = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        slug: &str,
    ) -> Result<Option<ShortLink>, AppError> {
        let sql =
            format!("SELECT {LINK_COLUMNS} FROM short_links WHERE slug = $1 AND user_id = $2");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(slug)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_with_counts(&self, user_id: Uuid) -> Result<Vec<LinkWithCounts>, AppError> {
        let rows = sqlx::query_as::<_, LinkCountsRow>(
            r#"
            SELECT
                l.id, l.user_id, l.slug, l.original_url,
                l.utm_source, l.utm_medium, l.utm_campaign,
                l.is_active, l.created_at, l.updated_at,
                COUNT(c.id) AS total_clicks,
                COUNT(c.id) FILTER (WHERE c.is_unique) AS unique_clicks
            FROM short_links l
            LEFT JOIN clicks c ON c.short_link_id = l.id
            WHERE l.user_id = $1
            GROUP BY l.id
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| LinkWithCounts {
                link: row.link.into(),
                total_clicks: row.total_clicks,
                unique_clicks: row.unique_clicks,
            })
            .collect())
    }

    async fn delete_owned(&self, user_id: Uuid, slug: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE slug = $1 AND user_id = $2")
            .bind(slug)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_owned(&self, user_id: Uuid, slug: &str) -> Result<Option<bool>, AppError> {
        let is_active: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE short_links
            SET is_active = NOT is_active, updated_at = NOW()
            WHERE slug = $1 AND user_id = $2
            RETURNING is_active
            "#,
        )
        .bind(slug)
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(is_active)
    }

    async fn update_utm_owned(
        &self,
        user_id: Uuid,
        slug: &str,
        utm: Utm,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET utm_source = $3, utm_medium = $4, utm_campaign = $5, updated_at = NOW()
            WHERE slug = $1 AND user_id = $2
            "#,
        )
        .bind(slug)
        .bind(user_id)
        .bind(utm.source)
        .bind(utm.medium)
        .bind(utm.campaign)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_slug_owned(
        &self,
        user_id: Uuid,
        slug: &str,
        new_slug: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET slug = $3, updated_at = NOW()
            WHERE slug = $1 AND user_id = $2
            "#,
        )
        .bind(slug)
        .bind(user_id)
        .bind(new_slug)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
