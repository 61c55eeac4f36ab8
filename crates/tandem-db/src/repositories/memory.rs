//! PostgreSQL implementation of MemoryRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use tandem_core::entities::Memory;
use tandem_core::traits::{MemoryRepository, RepoResult};
use tandem_core::value_objects::{MemoryId, RoomId};

use crate::models::MemoryModel;

use super::error::{map_db_error, memory_not_found};

/// PostgreSQL implementation of MemoryRepository
#[derive(Clone)]
pub struct PgMemoryRepository {
    pool: PgPool,
}

impl PgMemoryRepository {
    /// Create a new PgMemoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_for_room(&self, room_id: RoomId, filter: &str) -> RepoResult<Vec<Memory>> {
        let query = format!(
            r#"
            SELECT id, room_id, content, emotion, created_by, created_at, revealed_at
            FROM memories
            WHERE room_id = $1{filter}
            ORDER BY created_at DESC
            "#,
        );

        let results = sqlx::query_as::<_, MemoryModel>(&query)
            .bind(room_id.into_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        results.into_iter().map(Memory::try_from).collect()
    }
}

#[async_trait]
impl MemoryRepository for PgMemoryRepository {
    #[instrument(skip(self, memory), fields(memory_id = %memory.id))]
    async fn insert(&self, memory: &Memory) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO memories (id, room_id, content, emotion, created_by, created_at, revealed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(memory.id.into_uuid())
        .bind(memory.room_id.into_uuid())
        .bind(&memory.content)
        .bind(memory.emotion.as_str())
        .bind(memory.created_by.into_uuid())
        .bind(memory.created_at)
        .bind(memory.revealed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Memory>> {
        self.fetch_for_room(room_id, "").await
    }

    #[instrument(skip(self))]
    async fn find_revealed(&self, room_id: RoomId) -> RepoResult<Vec<Memory>> {
        self.fetch_for_room(room_id, " AND revealed_at IS NOT NULL").await
    }

    #[instrument(skip(self))]
    async fn find_unrevealed(&self, room_id: RoomId) -> RepoResult<Vec<Memory>> {
        self.fetch_for_room(room_id, " AND revealed_at IS NULL").await
    }

    #[instrument(skip(self))]
    async fn mark_revealed(&self, id: MemoryId, revealed_at: DateTime<Utc>) -> RepoResult<bool> {
        // The IS NULL guard makes the transition exactly-once: a concurrent
        // or repeated call matches zero rows and the stored timestamp stays.
        let result = sqlx::query(
            r#"
            UPDATE memories
            SET revealed_at = $2
            WHERE id = $1 AND revealed_at IS NULL
            "#,
        )
        .bind(id.into_uuid())
        .bind(revealed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Zero rows: either already revealed (no-op) or the id is unknown.
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM memories WHERE id = $1)
            "#,
        )
        .bind(id.into_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        if exists {
            Ok(false)
        } else {
            Err(memory_not_found(id))
        }
    }
}
