//! PostgreSQL implementation of PresenceRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tandem_core::entities::PresenceRecord;
use tandem_core::traits::{PresenceRepository, RepoResult};
use tandem_core::value_objects::RoomId;

use crate::models::PresenceModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PresenceRepository
#[derive(Clone)]
pub struct PgPresenceRepository {
    pool: PgPool,
}

impl PgPresenceRepository {
    /// Create a new PgPresenceRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceRepository for PgPresenceRepository {
    #[instrument(skip(self, record), fields(user_id = %record.user_id, room_id = %record.room_id))]
    async fn upsert(&self, record: &PresenceRecord) -> RepoResult<()> {
        // Keyed on (user_id, room_id): re-entering a room refreshes the
        // existing row instead of inserting a second one.
        sqlx::query(
            r#"
            INSERT INTO presence (user_id, room_id, is_online, last_seen)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, room_id)
            DO UPDATE SET is_online = EXCLUDED.is_online, last_seen = EXCLUDED.last_seen
            "#,
        )
        .bind(record.user_id.into_uuid())
        .bind(record.room_id.into_uuid())
        .bind(record.is_online)
        .bind(record.last_seen)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<PresenceRecord>> {
        let results = sqlx::query_as::<_, PresenceModel>(
            r#"
            SELECT user_id, room_id, is_online, last_seen
            FROM presence
            WHERE room_id = $1
            "#,
        )
        .bind(room_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(PresenceRecord::from).collect())
    }
}
