//! Room database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the rooms table
#[derive(Debug, Clone, FromRow)]
pub struct RoomModel {
    pub id: Uuid,
    pub name: String,
    pub join_code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
