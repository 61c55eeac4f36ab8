//! Presence service
//!
//! Tracks each member's online state per room. Entry and exit upsert the one
//! record per (user, room) key; the read side applies a staleness window so a
//! peer that vanished without an exit write still reads as offline.

use chrono::Utc;
use tracing::{info, instrument, warn};

use tandem_core::entities::PresenceRecord;
use tandem_core::events::{ChangeEvent, ChangeKind};
use tandem_core::value_objects::{RoomId, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::room::RoomService;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mark the user online in a room (called on room entry)
    #[instrument(skip(self))]
    pub async fn enter_room(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        RoomService::new(self.ctx)
            .require_member(room_id, user_id)
            .await?;

        self.upsert_and_notify(PresenceRecord::online(user_id, room_id))
            .await?;

        info!(user_id = %user_id, room_id = %room_id, "User entered room");
        Ok(())
    }

    /// Mark the user offline in a room (called on session close)
    #[instrument(skip(self))]
    pub async fn leave_room(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        self.upsert_and_notify(PresenceRecord::offline(user_id, room_id))
            .await?;

        info!(user_id = %user_id, room_id = %room_id, "User left room");
        Ok(())
    }

    /// Refresh the user's `last_seen` so the staleness window keeps them
    /// online. Skips the change event - nothing observable flips.
    #[instrument(skip(self))]
    pub async fn heartbeat(&self, room_id: RoomId, user_id: UserId) -> ServiceResult<()> {
        RoomService::new(self.ctx)
            .require_member(room_id, user_id)
            .await?;

        self.ctx
            .presence_repo()
            .upsert(&PresenceRecord::online(user_id, room_id))
            .await?;
        Ok(())
    }

    /// Effective online state of the viewer's partner.
    ///
    /// Excludes the viewer's own record; a missing partner record reads as
    /// offline. Records older than the configured TTL read as offline even
    /// with the online flag still set.
    #[instrument(skip(self))]
    pub async fn partner_online(&self, room_id: RoomId, viewer: UserId) -> ServiceResult<bool> {
        let records = self.ctx.presence_repo().find_by_room(room_id).await?;
        let now = Utc::now();
        let ttl = self.ctx.presence_ttl_seconds();

        Ok(records
            .iter()
            .filter(|r| r.user_id != viewer)
            .any(|r| r.is_online_at(now, ttl)))
    }

    async fn upsert_and_notify(&self, record: PresenceRecord) -> ServiceResult<()> {
        let room_id = record.room_id;
        self.ctx.presence_repo().upsert(&record).await?;

        if let Err(e) = self
            .ctx
            .publisher()
            .publish(&ChangeEvent::PresenceChanged {
                room_id,
                kind: ChangeKind::Update,
            })
            .await
        {
            warn!(error = %e, room_id = %room_id, "Failed to publish presence change");
        }

        Ok(())
    }
}
