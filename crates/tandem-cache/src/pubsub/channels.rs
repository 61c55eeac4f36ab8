//! Pub/Sub channel definitions.
//!
//! One Redis channel exists per (room, topic) pair. A room subscription
//! covers all three topic channels at once.

use tandem_core::events::ChangeTopic;
use tandem_core::value_objects::RoomId;

/// Channel prefix for room events
pub const ROOM_CHANNEL_PREFIX: &str = "room:";

/// A (room, topic) Redis channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomChannel {
    pub room_id: RoomId,
    pub topic: ChangeTopic,
}

impl RoomChannel {
    /// Create a channel for one room and topic
    #[must_use]
    pub fn new(room_id: RoomId, topic: ChangeTopic) -> Self {
        Self { room_id, topic }
    }

    /// All three topic channels for a room
    #[must_use]
    pub fn all_for_room(room_id: RoomId) -> [Self; 3] {
        [
            Self::new(room_id, ChangeTopic::Memories),
            Self::new(room_id, ChangeTopic::Presence),
            Self::new(room_id, ChangeTopic::Nudges),
        ]
    }

    /// Get the Redis channel name, e.g. `room:{uuid}:memories`
    #[must_use]
    pub fn name(&self) -> String {
        format!("{ROOM_CHANNEL_PREFIX}{}:{}", self.room_id, self.topic)
    }

    /// Parse a channel name back to a `RoomChannel`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(ROOM_CHANNEL_PREFIX)?;
        let (id_str, topic_str) = rest.rsplit_once(':')?;

        let room_id = id_str.parse::<RoomId>().ok()?;
        let topic = match topic_str {
            "memories" => ChangeTopic::Memories,
            "presence" => ChangeTopic::Presence,
            "nudges" => ChangeTopic::Nudges,
            _ => return None,
        };

        Some(Self::new(room_id, topic))
    }
}

impl std::fmt::Display for RoomChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
