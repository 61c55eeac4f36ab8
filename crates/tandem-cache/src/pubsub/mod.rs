//! Redis Pub/Sub - the transport behind the room change feed

mod channels;
mod publisher;
mod subscriber;

pub use channels::{RoomChannel, ROOM_CHANNEL_PREFIX};
pub use publisher::RoomPublisher;
pub use subscriber::{RoomSubscriber, SubscriberConfig, SubscriberError};
