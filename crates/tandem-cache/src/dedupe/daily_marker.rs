//! Daily reveal markers stored in Redis.
//!
//! A marker is a keyed flag that lives until the end of its calendar day
//! (UTC). Expiry is delegated to Redis TTLs so the flags need no sweeper.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, Utc};

use tandem_core::error::DomainError;
use tandem_core::traits::{DailyMarker, DedupeStore, RepoResult};

use crate::pool::RedisPool;

/// Floor for computed TTLs; a marker set just before midnight still needs a
/// nonzero expiry for SETEX.
const MIN_TTL_SECONDS: u64 = 1;

/// Redis-backed implementation of DedupeStore
#[derive(Clone)]
pub struct RedisDedupeStore {
    pool: RedisPool,
}

impl RedisDedupeStore {
    /// Create a new dedupe store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

/// Seconds from `now` until the end of the marker's calendar day.
///
/// Markers for past days get the minimum TTL so a late write still expires
/// promptly instead of lingering forever.
fn ttl_until_day_end(marker: &DailyMarker, now: DateTime<Utc>) -> u64 {
    let Some(next_day) = marker.date.succ_opt() else {
        return MIN_TTL_SECONDS;
    };
    let day_end = next_day.and_time(NaiveTime::MIN).and_utc();
    let remaining = day_end - now;

    if remaining <= Duration::zero() {
        MIN_TTL_SECONDS
    } else {
        // Duration is positive here, the cast cannot lose a sign
        #[allow(clippy::cast_sign_loss)]
        let secs = remaining.num_seconds() as u64;
        secs.max(MIN_TTL_SECONDS)
    }
}

#[async_trait]
impl DedupeStore for RedisDedupeStore {
    async fn is_set(&self, marker: &DailyMarker) -> RepoResult<bool> {
        self.pool
            .exists(&marker.key())
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))
    }

    async fn set(&self, marker: &DailyMarker) -> RepoResult<()> {
        let ttl = ttl_until_day_end(marker, Utc::now());

        self.pool
            .set(&marker.key(), &true, Some(ttl))
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        tracing::debug!(key = %marker.key(), ttl_seconds = ttl, "Daily marker set");
        Ok(())
    }
}
