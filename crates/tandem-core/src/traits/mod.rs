//! Ports - interfaces the infrastructure layers implement

mod change_stream;
mod dedupe;
mod repositories;

pub use change_stream::{ChangeFeed, ChangePublisher, ChangeStream, FeedError};
pub use dedupe::{DailyMarker, DedupeStore, MarkerKind};
pub use repositories::{
    MemberRepository, MemoryRepository, NudgeRepository, PresenceRepository, RepoResult,
    RoomRepository,
};
