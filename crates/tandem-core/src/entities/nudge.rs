//! Nudge entity - a one-shot attention signal between partners
//!
//! Nudge rows are append-only and carry no read/ack state; the "ephemeral"
//! part lives entirely in the delivery layer (a visible flag with a timer).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{RoomId, UserId};

/// Nudge event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NudgeEvent {
    pub room_id: RoomId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl NudgeEvent {
    /// Create a new NudgeEvent stamped now
    pub fn new(room_id: RoomId, from_user_id: UserId, to_user_id: UserId) -> Self {
        Self {
            room_id,
            from_user_id,
            to_user_id,
            created_at: Utc::now(),
        }
    }

    /// Check whether this nudge targets the given viewer
    #[inline]
    pub fn is_addressed_to(&self, viewer: UserId) -> bool {
        self.to_user_id == viewer
    }
}
