//! # tandem-core
//!
//! Domain layer containing entities, value objects, ports, and change events.
//! This crate has no dependency on the database or Redis layers; the only
//! infrastructure type it exposes is the `tokio` broadcast receiver inside
//! [`ChangeFeed`].

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    partner_of, Emotion, Memory, NudgeEvent, PresenceRecord, Room, RoomMember,
    MEMORY_CONTENT_MAX, ROOM_CAPACITY,
};
pub use error::DomainError;
pub use events::{ChangeEvent, ChangeKind, ChangeTopic};
pub use traits::{
    ChangeFeed, ChangePublisher, ChangeStream, DailyMarker, DedupeStore, FeedError, MarkerKind,
    MemberRepository, MemoryRepository, NudgeRepository, PresenceRepository, RepoResult,
    RoomRepository,
};
pub use value_objects::{generate_join_code, JoinCode, JoinCodeParseError, MemoryId, RoomId, UserId};
