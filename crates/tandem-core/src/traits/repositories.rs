//! Repository ports - define the interface for data access
//!
//! The domain layer defines what it needs from the store; the database layer
//! provides the implementation. Read failures must surface as errors, never
//! collapse to empty results.

use async_trait::async_trait;

use crate::entities::{Memory, NudgeEvent, PresenceRecord, Room, RoomMember};
use crate::error::DomainError;
use crate::value_objects::{JoinCode, MemoryId, RoomId, UserId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>>;

    /// Find room by join code.
    ///
    /// A missing code is `Ok(None)`; implementations reserve errors for
    /// transient store failures so callers can tell the two apart.
    async fn find_by_join_code(&self, code: &JoinCode) -> RepoResult<Option<Room>>;

    /// List all rooms the user is a member of
    async fn find_by_user(&self, user_id: UserId) -> RepoResult<Vec<Room>>;

    /// Create a new room
    async fn create(&self, room: &Room) -> RepoResult<()>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// List membership edges for a room
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<RoomMember>>;

    /// Check whether a user belongs to a room
    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool>;

    /// Add a membership edge
    async fn add(&self, member: &RoomMember) -> RepoResult<()>;
}

// ============================================================================
// Memory Repository
// ============================================================================

#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Insert a new memory
    async fn insert(&self, memory: &Memory) -> RepoResult<()>;

    /// List a room's memories, newest first
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Memory>>;

    /// List a room's memories with `revealed_at` set, newest first
    async fn find_revealed(&self, room_id: RoomId) -> RepoResult<Vec<Memory>>;

    /// List a room's memories with `revealed_at` still null, newest first
    async fn find_unrevealed(&self, room_id: RoomId) -> RepoResult<Vec<Memory>>;

    /// Set `revealed_at` on a memory if it is still null.
    ///
    /// Returns `true` when this call performed the transition and `false`
    /// when the memory was already revealed (a no-op; the stored timestamp is
    /// untouched). Unknown ids are an error.
    async fn mark_revealed(
        &self,
        id: MemoryId,
        revealed_at: chrono::DateTime<chrono::Utc>,
    ) -> RepoResult<bool>;
}

// ============================================================================
// Presence Repository
// ============================================================================

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Upsert the record for (user, room); at most one record per key exists
    async fn upsert(&self, record: &PresenceRecord) -> RepoResult<()>;

    /// Fetch all presence records for a room
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<PresenceRecord>>;
}

// ============================================================================
// Nudge Repository
// ============================================================================

#[async_trait]
pub trait NudgeRepository: Send + Sync {
    /// Append a nudge event. No rate limiting, no idempotency key: rapid
    /// duplicate sends produce duplicate rows.
    async fn insert(&self, nudge: &NudgeEvent) -> RepoResult<()>;
}
