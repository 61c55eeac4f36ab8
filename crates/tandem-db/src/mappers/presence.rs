//! PresenceRecord entity <-> model mapper

use tandem_core::entities::PresenceRecord;
use tandem_core::value_objects::{RoomId, UserId};

use crate::models::PresenceModel;

impl From<PresenceModel> for PresenceRecord {
    fn from(model: PresenceModel) -> Self {
        PresenceRecord {
            user_id: UserId::from_uuid(model.user_id),
            room_id: RoomId::from_uuid(model.room_id),
            is_online: model.is_online,
            last_seen: model.last_seen,
        }
    }
}
