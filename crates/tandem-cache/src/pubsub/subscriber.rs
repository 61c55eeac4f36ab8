//! Redis Pub/Sub subscriber.
//!
//! One background listener owns the pub/sub connection; room sessions share
//! it. The first subscriber for a room opens its three topic channels, the
//! last one closes them. Events fan out over a broadcast channel and each
//! [`ChangeFeed`] filters down to its own room.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::StreamExt;
use redis::Client;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use tandem_core::error::DomainError;
use tandem_core::events::ChangeEvent;
use tandem_core::traits::{ChangeFeed, ChangeStream, RepoResult};
use tandem_core::value_objects::RoomId;

use crate::pubsub::RoomChannel;

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Control channel closed")]
    ControlClosed,
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Channel buffer size for broadcast
    pub broadcast_buffer: usize,
    /// Initial reconnection delay in milliseconds (doubles per attempt)
    pub reconnect_delay_ms: u64,
    /// Upper bound for the reconnection delay in milliseconds
    pub reconnect_max_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
            reconnect_max_delay_ms: 30_000,
        }
    }
}

/// Commands for subscription management
#[derive(Debug)]
enum SubscriberCommand {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    Shutdown,
}

/// Redis-backed implementation of ChangeStream
pub struct RoomSubscriber {
    /// Open-session counts per room
    refcounts: Arc<DashMap<RoomId, usize>>,
    /// Broadcast sender for parsed events
    broadcast_tx: broadcast::Sender<ChangeEvent>,
    /// Control channel for subscription management
    control_tx: mpsc::Sender<SubscriberCommand>,
}

impl RoomSubscriber {
    /// Create a new subscriber and start the background listener
    #[must_use]
    pub fn new(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::channel(32);
        let refcounts = Arc::new(DashMap::new());

        let subscriber = Self {
            refcounts: refcounts.clone(),
            broadcast_tx: broadcast_tx.clone(),
            control_tx,
        };

        tokio::spawn(Self::listener_loop(
            config,
            refcounts,
            broadcast_tx,
            control_rx,
        ));

        subscriber
    }

    /// Background listener loop with exponential backoff on reconnect
    async fn listener_loop(
        config: SubscriberConfig,
        refcounts: Arc<DashMap<RoomId, usize>>,
        broadcast_tx: broadcast::Sender<ChangeEvent>,
        mut control_rx: mpsc::Receiver<SubscriberCommand>,
    ) {
        let mut delay_ms = config.reconnect_delay_ms;

        loop {
            match Self::run_listener(&config, &refcounts, &broadcast_tx, &mut control_rx).await {
                Ok(()) => {
                    tracing::info!("Subscriber shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, delay_ms, "Subscriber error, reconnecting...");
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                    delay_ms = (delay_ms * 2).min(config.reconnect_max_delay_ms);
                }
            }
        }
    }

    /// Run the listener until error or shutdown. `Ok(())` means shutdown.
    async fn run_listener(
        config: &SubscriberConfig,
        refcounts: &Arc<DashMap<RoomId, usize>>,
        broadcast_tx: &broadcast::Sender<ChangeEvent>,
        control_rx: &mut mpsc::Receiver<SubscriberCommand>,
    ) -> Result<(), SubscriberError> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;

        // Re-subscribe the channels of every room with open sessions; covers
        // subscriptions that were live before a reconnect.
        for entry in refcounts.iter() {
            for channel in RoomChannel::all_for_room(*entry.key()) {
                pubsub.subscribe(channel.name()).await?;
            }
        }

        tracing::info!("Subscriber connected to Redis");

        let mut stream = pubsub.on_message();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(msg) => {
                            let channel_name = msg.get_channel_name().to_string();
                            let payload: String = msg.get_payload().unwrap_or_default();

                            match serde_json::from_str::<ChangeEvent>(&payload) {
                                Ok(event) => {
                                    // Ignore send errors - no receivers
                                    let _ = broadcast_tx.send(event);
                                    tracing::trace!(channel = %channel_name, "Received change event");
                                }
                                Err(e) => {
                                    tracing::warn!(
                                        channel = %channel_name,
                                        error = %e,
                                        "Dropping unparseable event"
                                    );
                                }
                            }
                        }
                        None => {
                            tracing::warn!("Pub/Sub stream ended");
                            return Err(SubscriberError::ControlClosed);
                        }
                    }
                }

                cmd = control_rx.recv() => {
                    match cmd {
                        Some(SubscriberCommand::Subscribe(channels)) => {
                            // Need to drop stream to access pubsub
                            drop(stream);
                            for channel in &channels {
                                if let Err(e) = pubsub.subscribe(channel).await {
                                    tracing::error!(channel = %channel, error = %e, "Failed to subscribe");
                                } else {
                                    tracing::debug!(channel = %channel, "Subscribed to channel");
                                }
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Unsubscribe(channels)) => {
                            drop(stream);
                            for channel in &channels {
                                if let Err(e) = pubsub.unsubscribe(channel).await {
                                    tracing::error!(channel = %channel, error = %e, "Failed to unsubscribe");
                                } else {
                                    tracing::debug!(channel = %channel, "Unsubscribed from channel");
                                }
                            }
                            stream = pubsub.on_message();
                        }
                        Some(SubscriberCommand::Shutdown) | None => {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn room_channel_names(room_id: RoomId) -> Vec<String> {
        RoomChannel::all_for_room(room_id)
            .iter()
            .map(RoomChannel::name)
            .collect()
    }

    /// Shutdown the background listener
    pub async fn shutdown(&self) -> Result<(), SubscriberError> {
        self.control_tx
            .send(SubscriberCommand::Shutdown)
            .await
            .map_err(|_| SubscriberError::ControlClosed)
    }
}

#[async_trait::async_trait]
impl ChangeStream for RoomSubscriber {
    async fn subscribe(&self, room_id: RoomId) -> RepoResult<ChangeFeed> {
        let is_first = {
            let mut count = self.refcounts.entry(room_id).or_insert(0);
            *count += 1;
            *count == 1
        };

        if is_first {
            self.control_tx
                .send(SubscriberCommand::Subscribe(Self::room_channel_names(
                    room_id,
                )))
                .await
                .map_err(|_| DomainError::CacheError("subscriber control channel closed".into()))?;
        }

        Ok(ChangeFeed::new(room_id, self.broadcast_tx.subscribe()))
    }

    async fn unsubscribe(&self, room_id: RoomId) -> RepoResult<()> {
        // Decrement and remove under one entry guard; a racing subscribe
        // either sees the old count or re-inserts after the removal, never a
        // removal of its own fresh entry.
        let is_last = match self.refcounts.entry(room_id) {
            Entry::Occupied(mut entry) => {
                let count = entry.get_mut();
                *count = count.saturating_sub(1);
                if *count == 0 {
                    entry.remove();
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(_) => return Ok(()),
        };

        if is_last {
            self.control_tx
                .send(SubscriberCommand::Unsubscribe(Self::room_channel_names(
                    room_id,
                )))
                .await
                .map_err(|_| DomainError::CacheError("subscriber control channel closed".into()))?;
        }

        Ok(())
    }
}
