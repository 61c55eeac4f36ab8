//! Daily dedupe marker storage

mod daily_marker;

pub use daily_marker::RedisDedupeStore;
