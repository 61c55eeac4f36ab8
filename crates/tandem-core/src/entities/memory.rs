//! Memory entity - a saved moment shared inside a room
//!
//! `revealed_at` is sticky: it starts `None`, is set exactly once when the
//! memory is cherished in a daily reveal, and is never cleared afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MemoryId, RoomId, UserId};

/// Maximum memory content length in characters
pub const MEMORY_CONTENT_MAX: usize = 2000;

/// The emotion attached to a memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Excited,
    Grateful,
    Loved,
    Peaceful,
}

impl Emotion {
    /// All emotions, in presentation order
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Excited,
        Emotion::Grateful,
        Emotion::Loved,
        Emotion::Peaceful,
    ];

    /// Stable lowercase name used in storage
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Grateful => "grateful",
            Self::Loved => "loved",
            Self::Peaceful => "peaceful",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "excited" => Ok(Self::Excited),
            "grateful" => Ok(Self::Grateful),
            "loved" => Ok(Self::Loved),
            "peaceful" => Ok(Self::Peaceful),
            _ => Err(format!("Invalid emotion: {s}")),
        }
    }
}

/// Memory entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    pub id: MemoryId,
    pub room_id: RoomId,
    pub content: String,
    pub emotion: Emotion,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub revealed_at: Option<DateTime<Utc>>,
}

impl Memory {
    /// Create a new, unrevealed Memory
    pub fn new(
        room_id: RoomId,
        created_by: UserId,
        content: impl Into<String>,
        emotion: Emotion,
    ) -> Self {
        Self {
            id: MemoryId::generate(),
            room_id,
            content: content.into(),
            emotion,
            created_by,
            created_at: Utc::now(),
            revealed_at: None,
        }
    }

    /// Check whether the memory has ever been revealed
    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    /// Mark the memory as revealed at `when`.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// memory was already revealed (the existing timestamp is kept).
    pub fn reveal(&mut self, when: DateTime<Utc>) -> bool {
        if self.revealed_at.is_some() {
            return false;
        }
        self.revealed_at = Some(when);
        true
    }
}
