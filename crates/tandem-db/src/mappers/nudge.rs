//! NudgeEvent entity <-> model mapper

use tandem_core::entities::NudgeEvent;
use tandem_core::value_objects::{RoomId, UserId};

use crate::models::NudgeModel;

/// The surrogate row id is a storage detail and does not appear on the entity.
impl From<NudgeModel> for NudgeEvent {
    fn from(model: NudgeModel) -> Self {
        NudgeEvent {
            room_id: RoomId::from_uuid(model.room_id),
            from_user_id: UserId::from_uuid(model.from_user_id),
            to_user_id: UserId::from_uuid(model.to_user_id),
            created_at: model.created_at,
        }
    }
}
