//! Room entity <-> model mapper

use tandem_core::entities::Room;
use tandem_core::error::DomainError;
use tandem_core::value_objects::{JoinCode, RoomId, UserId};

use crate::models::RoomModel;

/// Convert a RoomModel to a Room entity.
///
/// The join_code column is validated at insert time; a row that fails to
/// parse here means corrupt data, surfaced as a database error.
impl TryFrom<RoomModel> for Room {
    type Error = DomainError;

    fn try_from(model: RoomModel) -> Result<Self, Self::Error> {
        let join_code = JoinCode::parse(&model.join_code)
            .map_err(|e| DomainError::DatabaseError(format!("corrupt join code: {e}")))?;

        Ok(Room {
            id: RoomId::from_uuid(model.id),
            name: model.name,
            join_code,
            created_by: UserId::from_uuid(model.created_by),
            created_at: model.created_at,
        })
    }
}
