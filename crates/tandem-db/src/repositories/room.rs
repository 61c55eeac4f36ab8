//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tandem_core::entities::Room;
use tandem_core::error::DomainError;
use tandem_core::traits::{RepoResult, RoomRepository};
use tandem_core::value_objects::{JoinCode, RoomId, UserId};

use crate::models::RoomModel;

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    /// Create a new PgRoomRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, join_code, created_by, created_at
            FROM rooms
            WHERE id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Room::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_join_code(&self, code: &JoinCode) -> RepoResult<Option<Room>> {
        // A missing code is Ok(None); only store failures become errors, so
        // callers can tell "no such code" from "could not look it up".
        let result = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT id, name, join_code, created_by, created_at
            FROM rooms
            WHERE join_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Room::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(
            r#"
            SELECT r.id, r.name, r.join_code, r.created_by, r.created_at
            FROM rooms r
            JOIN room_members rm ON rm.room_id = r.id
            WHERE rm.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Room::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn create(&self, room: &Room) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, name, join_code, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(room.id.into_uuid())
        .bind(&room.name)
        .bind(room.join_code.as_str())
        .bind(room.created_by.into_uuid())
        .bind(room.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::JoinCodeExists))?;

        Ok(())
    }
}
