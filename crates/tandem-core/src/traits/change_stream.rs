//! Change stream ports - subscribe to and publish room mutation events
//!
//! One live subscription exists per open room session, multiplexing the
//! memory, presence, and nudge topics. Delivery is at-least-once with no
//! cross-topic ordering; duplicates are possible and consumers must tolerate
//! them.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::DomainError;
use crate::events::ChangeEvent;
use crate::value_objects::RoomId;

/// Result type shared with the repositories
use super::repositories::RepoResult;

/// Error while reading from a [`ChangeFeed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// The receiver fell behind and `n` events were dropped. Consumers treat
    /// this as "everything may have changed" and re-query all snapshots.
    #[error("feed lagged, {0} events dropped")]
    Lagged(u64),

    /// The transport shut down; no further events will arrive.
    #[error("feed closed")]
    Closed,
}

/// Handle to a live per-room event feed.
///
/// Dropping the feed releases the local receiver; the subscription itself is
/// released via [`ChangeStream::unsubscribe`], which the room session calls
/// on teardown.
pub struct ChangeFeed {
    room_id: RoomId,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl ChangeFeed {
    /// Wrap a broadcast receiver scoped to one room
    #[must_use]
    pub fn new(room_id: RoomId, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self { room_id, receiver }
    }

    /// The room this feed is scoped to
    #[must_use]
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Receive the next event for this room.
    ///
    /// Events for other rooms sharing the underlying transport are filtered
    /// out here.
    pub async fn recv(&mut self) -> Result<ChangeEvent, FeedError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.room_id() == self.room_id => return Ok(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(n)) => return Err(FeedError::Lagged(n)),
                Err(broadcast::error::RecvError::Closed) => return Err(FeedError::Closed),
            }
        }
    }
}

impl std::fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("room_id", &self.room_id)
            .finish()
    }
}

/// Port for subscribing to a room's mutation stream
#[async_trait]
pub trait ChangeStream: Send + Sync {
    /// Open (or join) the subscription for a room and get a feed handle
    async fn subscribe(&self, room_id: RoomId) -> RepoResult<ChangeFeed>;

    /// Release one subscription for a room. The transport drops the room's
    /// channels once the last session unsubscribes.
    async fn unsubscribe(&self, room_id: RoomId) -> RepoResult<()>;
}

/// Port for publishing mutation events after a successful write.
///
/// Stands in for the store's native row-level change stream: services publish
/// the matching event themselves once the write lands.
#[async_trait]
pub trait ChangePublisher: Send + Sync {
    /// Publish an event to the room's subscribers
    async fn publish(&self, event: &ChangeEvent) -> RepoResult<()>;
}

impl From<FeedError> for DomainError {
    fn from(err: FeedError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}
