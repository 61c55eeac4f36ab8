//! Redis Pub/Sub publisher.
//!
//! Services publish a change event after each successful write; the event
//! lands on the room's topic channel and reaches every open session.

use async_trait::async_trait;
use redis::AsyncCommands;

use tandem_core::error::DomainError;
use tandem_core::events::ChangeEvent;
use tandem_core::traits::{ChangePublisher, RepoResult};

use crate::pool::RedisPool;
use crate::pubsub::RoomChannel;

/// Redis-backed implementation of ChangePublisher
#[derive(Clone)]
pub struct RoomPublisher {
    pool: RedisPool,
}

impl RoomPublisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangePublisher for RoomPublisher {
    async fn publish(&self, event: &ChangeEvent) -> RepoResult<()> {
        let channel = RoomChannel::new(event.room_id(), event.topic());
        let channel_name = channel.name();

        let payload = serde_json::to_string(event)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        let receivers: u32 = conn
            .publish(&channel_name, &payload)
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        tracing::debug!(
            channel = %channel_name,
            receivers = receivers,
            "Published change event"
        );

        Ok(())
    }
}
