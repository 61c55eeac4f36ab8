//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MemoryId, RoomId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    #[error("Memory not found: {0}")]
    MemoryNotFound(MemoryId),

    #[error("Member not found in room")]
    MemberNotFound,

    #[error("No room with join code: {0}")]
    JoinCodeNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid emotion: {0}")]
    InvalidEmotion(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Already a member of this room")]
    AlreadyMember,

    #[error("Room already has two members")]
    RoomFull,

    #[error("Join code already exists")]
    JoinCodeExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    /// Transient failure talking to the store. Distinct from the not-found
    /// variants so callers can retry this one and not the others.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs and outward-facing messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::MemoryNotFound(_) => "UNKNOWN_MEMORY",
            Self::MemberNotFound => "UNKNOWN_MEMBER",
            Self::JoinCodeNotFound(_) => "UNKNOWN_JOIN_CODE",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidEmotion(_) => "INVALID_EMOTION",

            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::RoomFull => "ROOM_FULL",
            Self::JoinCodeExists => "JOIN_CODE_EXISTS",

            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RoomNotFound(_)
                | Self::MemoryNotFound(_)
                | Self::MemberNotFound
                | Self::JoinCodeNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::ContentTooLong { .. } | Self::InvalidEmotion(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyMember | Self::RoomFull | Self::JoinCodeExists)
    }

    /// Check if retrying the operation may succeed.
    ///
    /// Only infrastructure failures are retryable; a missing join code stays
    /// missing no matter how often the caller retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::DatabaseError(_) | Self::CacheError(_)
        )
    }
}
