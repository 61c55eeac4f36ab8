//! Memory entity <-> model mapper

use tandem_core::entities::Memory;
use tandem_core::error::DomainError;
use tandem_core::value_objects::{MemoryId, RoomId, UserId};

use crate::models::MemoryModel;

/// Convert a MemoryModel to a Memory entity.
///
/// The emotion column holds one of the known lowercase names; anything else
/// is rejected rather than silently defaulted.
impl TryFrom<MemoryModel> for Memory {
    type Error = DomainError;

    fn try_from(model: MemoryModel) -> Result<Self, Self::Error> {
        let emotion = model
            .emotion
            .parse()
            .map_err(|_| DomainError::InvalidEmotion(model.emotion.clone()))?;

        Ok(Memory {
            id: MemoryId::from_uuid(model.id),
            room_id: RoomId::from_uuid(model.room_id),
            content: model.content,
            emotion,
            created_by: UserId::from_uuid(model.created_by),
            created_at: model.created_at,
            revealed_at: model.revealed_at,
        })
    }
}
