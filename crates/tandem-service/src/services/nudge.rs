//! Nudge service
//!
//! A nudge is a one-shot "thinking of you" poke at the partner. The write
//! path is deliberately dumb: insert a row, publish the event, no rate limit
//! and no idempotency key. Rapid duplicate sends produce duplicate events.

use tracing::{info, instrument, warn};

use tandem_core::entities::NudgeEvent;
use tandem_core::error::DomainError;
use tandem_core::events::ChangeEvent;
use tandem_core::value_objects::{RoomId, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::room::RoomService;

/// Nudge service
pub struct NudgeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NudgeService<'a> {
    /// Create a new NudgeService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a nudge to the partner.
    ///
    /// Requires a joined partner to address; nudging an otherwise empty room
    /// is an error rather than a write nobody can receive.
    #[instrument(skip(self))]
    pub async fn send_nudge(&self, room_id: RoomId, from: UserId) -> ServiceResult<NudgeEvent> {
        let room_service = RoomService::new(self.ctx);
        room_service.require_member(room_id, from).await?;

        let to = room_service
            .partner(room_id, from)
            .await?
            .ok_or(DomainError::MemberNotFound)?;

        let nudge = NudgeEvent::new(room_id, from, to);
        self.ctx.nudge_repo().insert(&nudge).await?;

        info!(room_id = %room_id, from = %from, to = %to, "Nudge sent");

        // Unlike the invalidation topics this event carries the payload
        // itself; the receiving session consumes it without a re-query.
        if let Err(e) = self
            .ctx
            .publisher()
            .publish(&ChangeEvent::NudgeSent {
                nudge: nudge.clone(),
            })
            .await
        {
            warn!(error = %e, room_id = %room_id, "Failed to publish nudge");
        }

        Ok(nudge)
    }
}
