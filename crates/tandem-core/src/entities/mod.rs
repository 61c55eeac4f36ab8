//! Domain entities

mod member;
mod memory;
mod nudge;
mod presence;
mod room;

pub use member::{partner_of, RoomMember};
pub use memory::{Emotion, Memory, MEMORY_CONTENT_MAX};
pub use nudge::NudgeEvent;
pub use presence::PresenceRecord;
pub use room::{Room, ROOM_CAPACITY};
