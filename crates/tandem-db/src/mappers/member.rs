//! RoomMember entity <-> model mapper

use tandem_core::entities::RoomMember;
use tandem_core::value_objects::{RoomId, UserId};

use crate::models::RoomMemberModel;

impl From<RoomMemberModel> for RoomMember {
    fn from(model: RoomMemberModel) -> Self {
        RoomMember {
            room_id: RoomId::from_uuid(model.room_id),
            user_id: UserId::from_uuid(model.user_id),
            joined_at: model.joined_at,
        }
    }
}
