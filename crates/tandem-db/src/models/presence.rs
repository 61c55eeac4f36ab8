//! Presence database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the presence table
#[derive(Debug, Clone, FromRow)]
pub struct PresenceModel {
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
}
