//! # tandem-cache
//!
//! Redis layer for the live room feed and the daily reveal markers.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Per-room change events multiplexed over three topics
//! - **Dedupe Markers**: Per-day flags that expire at the next UTC midnight
//!
//! ## Example
//!
//! ```ignore
//! use tandem_cache::{RedisPool, RedisPoolConfig, RoomPublisher, RoomSubscriber};
//! use tandem_core::{ChangeEvent, ChangeKind, ChangePublisher, ChangeStream};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = RoomPublisher::new(pool.clone());
//! let subscriber = RoomSubscriber::new(SubscriberConfig::default());
//!
//! let mut feed = subscriber.subscribe(room_id).await?;
//! publisher
//!     .publish(&ChangeEvent::MemoriesChanged { room_id, kind: ChangeKind::Insert })
//!     .await?;
//! let event = feed.recv().await?;
//! ```

pub mod dedupe;
pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export pubsub types
pub use pubsub::{RoomChannel, RoomPublisher, RoomSubscriber, SubscriberConfig, ROOM_CHANNEL_PREFIX};

// Re-export dedupe types
pub use dedupe::RedisDedupeStore;
