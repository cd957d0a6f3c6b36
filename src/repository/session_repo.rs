//! Session repository
//! Insert-only writes, exact-match reads by token.

use crate::{db, error::AppError, models::session::SessionRecord};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Append a session record. No duplicate detection.
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError>;

    /// Look up a session by exact token match
    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AppError>;

    /// Cheap connectivity check for health and readiness
    async fn ping(&self) -> Result<(), AppError>;
}

pub struct PgSessionRepository {
    db: PgPool,
}

impl PgSessionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn insert(&self, record: &SessionRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(record.user_id)
        .bind(&record.token)
        .bind(record.expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<SessionRecord>, AppError> {
        // Two logins by one user within the same second mint identical tokens,
        // so more than one row can match.
        let record = sqlx::query_as::<_, SessionRecord>(
            r#"
            SELECT user_id, token, expires_at
            FROM user_sessions
            WHERE token = $1
            ORDER BY expires_at DESC
            LIMIT 1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn ping(&self) -> Result<(), AppError> {
        db::ping(&self.db).await?;
        Ok(())
    }
}
