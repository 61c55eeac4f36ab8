//! Value objects - typed identifiers and the room join code

mod ids;
mod join_code;

pub use ids::{MemoryId, RoomId, UserId};
pub use join_code::{generate_join_code, JoinCode, JoinCodeParseError, JOIN_CODE_LEN};
