//! Change events - row-level mutation notifications for a room
//!
//! Delivery is at-least-once with no ordering guarantee across topics.
//! Memory and presence events are invalidation signals only: consumers must
//! drop their cached snapshot and re-query, never apply the event as a patch.
//! The nudge event is the one exception - its payload is trusted and consumed
//! directly by the delivery layer.

use serde::{Deserialize, Serialize};

use crate::entities::NudgeEvent;
use crate::value_objects::RoomId;

/// Logical topics multiplexed over one room subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTopic {
    Memories,
    Presence,
    Nudges,
}

impl ChangeTopic {
    /// All topics a room subscription covers
    pub const ALL: [ChangeTopic; 3] = [
        ChangeTopic::Memories,
        ChangeTopic::Presence,
        ChangeTopic::Nudges,
    ];

    /// Stable lowercase name used in channel names
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memories => "memories",
            Self::Presence => "presence",
            Self::Nudges => "nudges",
        }
    }
}

impl std::fmt::Display for ChangeTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of row mutation behind a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A mutation notification scoped to one room.
///
/// Only [`ChangeEvent::NudgeSent`] carries a payload; the other variants
/// deliberately carry nothing beyond the room and mutation kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeEvent {
    MemoriesChanged { room_id: RoomId, kind: ChangeKind },
    PresenceChanged { room_id: RoomId, kind: ChangeKind },
    NudgeSent { nudge: NudgeEvent },
}

impl ChangeEvent {
    /// The topic this event belongs to
    #[must_use]
    pub fn topic(&self) -> ChangeTopic {
        match self {
            Self::MemoriesChanged { .. } => ChangeTopic::Memories,
            Self::PresenceChanged { .. } => ChangeTopic::Presence,
            Self::NudgeSent { .. } => ChangeTopic::Nudges,
        }
    }

    /// The room this event is scoped to
    #[must_use]
    pub fn room_id(&self) -> RoomId {
        match self {
            Self::MemoriesChanged { room_id, .. } | Self::PresenceChanged { room_id, .. } => {
                *room_id
            }
            Self::NudgeSent { nudge } => nudge.room_id,
        }
    }
}
