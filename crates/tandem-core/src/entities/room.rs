//! Room entity - the shared context between two paired participants

use chrono::{DateTime, Utc};

use crate::value_objects::{JoinCode, RoomId, UserId};

/// Maximum number of members in a room. Rooms pair exactly two participants.
pub const ROOM_CAPACITY: usize = 2;

/// Room entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub join_code: JoinCode,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Create a new Room
    pub fn new(name: impl Into<String>, join_code: JoinCode, created_by: UserId) -> Self {
        Self {
            id: RoomId::generate(),
            name: name.into(),
            join_code,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Check if the given user created this room
    #[inline]
    pub fn is_creator(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }
}
