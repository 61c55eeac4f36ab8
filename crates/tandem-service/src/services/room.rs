//! Room service
//!
//! Room creation and join-code pairing. Rooms hold exactly two members; the
//! creator is the first, the partner joins by typing the shared code.

use tracing::{info, instrument, warn};

use tandem_core::entities::{partner_of, Room, RoomMember, ROOM_CAPACITY};
use tandem_core::error::DomainError;
use tandem_core::value_objects::{generate_join_code, JoinCode, RoomId, UserId};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Attempts before giving up on finding an unused join code
const JOIN_CODE_ATTEMPTS: usize = 5;

/// Maximum room name length in characters
const ROOM_NAME_MAX: usize = 100;

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a room and add the creator as its first member.
    ///
    /// Join code collisions surface as a unique violation on insert; the
    /// code is regenerated and the insert retried a few times.
    #[instrument(skip(self))]
    pub async fn create_room(&self, name: &str, creator: UserId) -> ServiceResult<Room> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::validation("room name must not be empty"));
        }
        if name.chars().count() > ROOM_NAME_MAX {
            return Err(ServiceError::validation(format!(
                "room name must be at most {ROOM_NAME_MAX} characters"
            )));
        }

        let mut last_err = None;
        for _ in 0..JOIN_CODE_ATTEMPTS {
            let room = Room::new(name, generate_join_code(), creator);

            match self.ctx.room_repo().create(&room).await {
                Ok(()) => {
                    self.ctx
                        .member_repo()
                        .add(&RoomMember::new(room.id, creator))
                        .await?;

                    info!(room_id = %room.id, join_code = %room.join_code, "Room created");
                    return Ok(room);
                }
                Err(DomainError::JoinCodeExists) => {
                    warn!("Join code collision, regenerating");
                    last_err = Some(DomainError::JoinCodeExists);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err
            .map_or_else(|| ServiceError::internal("join code generation failed"), Into::into))
    }

    /// Join a room by its shared code.
    ///
    /// An unknown code is `JoinCodeNotFound`; a store failure during lookup
    /// keeps its infrastructure error kind so only that case reads as
    /// retryable.
    #[instrument(skip(self))]
    pub async fn join_room(&self, code: &str, user_id: UserId) -> ServiceResult<Room> {
        let code = JoinCode::parse(code)
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let room = self
            .ctx
            .room_repo()
            .find_by_join_code(&code)
            .await?
            .ok_or(DomainError::JoinCodeNotFound(code.as_str().to_string()))?;

        let members = self.ctx.member_repo().find_by_room(room.id).await?;

        if members.iter().any(|m| m.user_id == user_id) {
            return Err(DomainError::AlreadyMember.into());
        }
        if members.len() >= ROOM_CAPACITY {
            return Err(DomainError::RoomFull.into());
        }

        self.ctx
            .member_repo()
            .add(&RoomMember::new(room.id, user_id))
            .await?;

        info!(room_id = %room.id, user_id = %user_id, "User joined room");
        Ok(room)
    }

    /// List all rooms the user belongs to, newest first
    #[instrument(skip(self))]
    pub async fn rooms_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Room>> {
        Ok(self.ctx.room_repo().find_by_user(user_id).await?)
    }

    /// Get a room by id
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: RoomId) -> ServiceResult<Room> {
        self.ctx
            .room_repo()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::RoomNotFound(room_id).into())
    }

    /// List a room's membership edges
    #[instrument(skip(self))]
    pub async fn members(&self, room_id: RoomId) -> ServiceResult<Vec<RoomMember>> {
        Ok(self.ctx.member_repo().find_by_room(room_id).await?)
    }

    /// The other member of the room, if the partner has joined
    #[instrument(skip(self))]
    pub async fn partner(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<Option<UserId>> {
        let members = self.ctx.member_repo().find_by_room(room_id).await?;
        Ok(partner_of(&members, user_id).map(|m| m.user_id))
    }

    /// Ensure the user belongs to the room
    pub(crate) async fn require_member(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        if self.ctx.member_repo().is_member(room_id, user_id).await? {
            Ok(())
        } else {
            Err(DomainError::MemberNotFound.into())
        }
    }
}
