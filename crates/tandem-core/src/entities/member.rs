//! Member entity - represents a user's membership in a room
//!
//! Membership edges are immutable: created when a room is created or joined,
//! never updated or deleted.

use chrono::{DateTime, Utc};

use crate::value_objects::{RoomId, UserId};

/// Room member entity (junction between user and room)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub joined_at: DateTime<Utc>,
}

impl RoomMember {
    /// Create a new RoomMember
    pub fn new(room_id: RoomId, user_id: UserId) -> Self {
        Self {
            room_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}

/// Find the partner of `user_id` among a room's membership edges.
///
/// Returns `None` when the caller is alone in the room (or not a member at
/// all). With the two-member cap there is at most one partner.
pub fn partner_of(members: &[RoomMember], user_id: UserId) -> Option<&RoomMember> {
    members.iter().find(|m| m.user_id != user_id)
}
