//! Daily dedupe markers - keyed flags with a one-calendar-day lifetime
//!
//! Two independent markers gate the daily reveal flow:
//! - `PromptShown`: the reveal prompt was displayed to this viewer today.
//! - `MemoryRevealed`: the viewer cherished a memory today.
//!
//! The two have distinct semantics (dismissing the prompt sets only the
//! first) and are stored under distinct keys. Markers expire at the next UTC
//! midnight rather than a rolling 24 hours, matching the "per calendar day"
//! contract.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::value_objects::{RoomId, UserId};

use super::repositories::RepoResult;

/// Which per-day flag a marker represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// The daily reveal prompt was shown today
    PromptShown,
    /// A memory was revealed ("cherished") today
    MemoryRevealed,
}

impl MarkerKind {
    /// Stable name used in storage keys
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PromptShown => "prompt_shown",
            Self::MemoryRevealed => "memory_revealed",
        }
    }
}

/// Key of a daily dedupe marker: one flag per (kind, room, viewer, day)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DailyMarker {
    pub kind: MarkerKind,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub date: NaiveDate,
}

impl DailyMarker {
    /// Build a marker key for the given day
    #[must_use]
    pub fn new(kind: MarkerKind, room_id: RoomId, user_id: UserId, date: NaiveDate) -> Self {
        Self {
            kind,
            room_id,
            user_id,
            date,
        }
    }

    /// Build a marker key for today (UTC)
    #[must_use]
    pub fn today(kind: MarkerKind, room_id: RoomId, user_id: UserId) -> Self {
        Self::new(kind, room_id, user_id, chrono::Utc::now().date_naive())
    }

    /// Storage key, e.g. `reveal:prompt_shown:{room}:{user}:2025-03-14`
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "reveal:{}:{}:{}:{}",
            self.kind.as_str(),
            self.room_id,
            self.user_id,
            self.date
        )
    }
}

/// Port for the marker store. Implementations expire entries at the end of
/// the marker's calendar day.
#[async_trait]
pub trait DedupeStore: Send + Sync {
    /// Check whether a marker is set
    async fn is_set(&self, marker: &DailyMarker) -> RepoResult<bool>;

    /// Set a marker until the end of its calendar day
    async fn set(&self, marker: &DailyMarker) -> RepoResult<()>;
}
