//! Nudge database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the nudges table
#[derive(Debug, Clone, FromRow)]
pub struct NudgeModel {
    pub id: i64,
    pub room_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
