//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in tandem-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod member;
mod memory;
mod nudge;
mod presence;
mod room;

pub use member::PgMemberRepository;
pub use memory::PgMemoryRepository;
pub use nudge::PgNudgeRepository;
pub use presence::PgPresenceRepository;
pub use room::PgRoomRepository;
