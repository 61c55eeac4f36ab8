//! PostgreSQL implementation of NudgeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tandem_core::entities::NudgeEvent;
use tandem_core::traits::{NudgeRepository, RepoResult};

use super::error::map_db_error;

/// PostgreSQL implementation of NudgeRepository
#[derive(Clone)]
pub struct PgNudgeRepository {
    pool: PgPool,
}

impl PgNudgeRepository {
    /// Create a new PgNudgeRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NudgeRepository for PgNudgeRepository {
    #[instrument(skip(self, nudge), fields(room_id = %nudge.room_id))]
    async fn insert(&self, nudge: &NudgeEvent) -> RepoResult<()> {
        // Append-only, no conflict handling: rapid duplicate sends are
        // expected to produce duplicate rows.
        sqlx::query(
            r#"
            INSERT INTO nudges (room_id, from_user_id, to_user_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(nudge.room_id.into_uuid())
        .bind(nudge.from_user_id.into_uuid())
        .bind(nudge.to_user_id.into_uuid())
        .bind(nudge.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
