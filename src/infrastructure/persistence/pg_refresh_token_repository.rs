//! PostgreSQL implementation of refresh token repository.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::RefreshCredential;
use crate::domain::repositories::RefreshTokenRepository;
use crate::error::AppError;

/// PostgreSQL repository for refresh credentials.
///
/// Stores HMAC digests only. `refresh_tokens_user_id_key` keeps one row per user.
pub struct PgRefreshTokenRepository {
    pool: Arc<PgPool>,
}

impl PgRefreshTokenRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Inserts the first credential of a user on an open connection or transaction.
///
/// Fails with a unique violation if the user already has one.
pub(crate) async fn insert_credential(
    conn: &mut PgConnection,
    user_id: Uuid,
    token_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (user_id, token_hash)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .execute(conn)
    .await?;

    Ok(())
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn upsert(&self, user_id: Uuid, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET token_hash = EXCLUDED.token_hash, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_by_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshCredential>, AppError> {
        let row = sqlx::query_as::<_, RefreshCredential>(
            r#"
            SELECT id, user_id, token_hash, created_at, updated_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn rotate(
        &self,
        user_id: Uuid,
        old_hash: &str,
        new_hash: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET token_hash = $3, updated_at = NOW()
            WHERE user_id = $1
              AND token_hash = $2
            "#,
        )
        .bind(user_id)
        .bind(old_hash)
        .bind(new_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
