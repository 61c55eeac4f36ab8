//! Memory database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the memories table
#[derive(Debug, Clone, FromRow)]
pub struct MemoryModel {
    pub id: Uuid,
    pub room_id: Uuid,
    pub content: String,
    pub emotion: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub revealed_at: Option<DateTime<Utc>>,
}
