//! Presence entity - a participant's live online/offline state in a room
//!
//! Exactly one record exists per (user, room) key; room entry upserts it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{RoomId, UserId};

/// Presence record, unique per (user_id, room_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub user_id: UserId,
    pub room_id: RoomId,
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
}

impl PresenceRecord {
    /// Create an online record stamped now
    pub fn online(user_id: UserId, room_id: RoomId) -> Self {
        Self {
            user_id,
            room_id,
            is_online: true,
            last_seen: Utc::now(),
        }
    }

    /// Create an offline record stamped now
    pub fn offline(user_id: UserId, room_id: RoomId) -> Self {
        Self {
            user_id,
            room_id,
            is_online: false,
            last_seen: Utc::now(),
        }
    }

    /// Effective online state at `now` with a staleness window.
    ///
    /// A record whose `last_seen` is older than `ttl_seconds` counts as
    /// offline even if `is_online` is still set; this covers peers that
    /// disconnected without an exit write.
    pub fn is_online_at(&self, now: DateTime<Utc>, ttl_seconds: u64) -> bool {
        self.is_online && now - self.last_seen <= Duration::seconds(ttl_seconds as i64)
    }

    /// Refresh `last_seen` to now (heartbeat)
    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }
}
