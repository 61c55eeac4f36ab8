//! Database models - SQLx-compatible structs for PostgreSQL tables

mod member;
mod memory;
mod nudge;
mod presence;
mod room;

pub use member::RoomMemberModel;
pub use memory::MemoryModel;
pub use nudge::NudgeModel;
pub use presence::PresenceModel;
pub use room::RoomModel;
