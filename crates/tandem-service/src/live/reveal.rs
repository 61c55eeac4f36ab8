//! Daily reveal flow.
//!
//! Once per calendar day (UTC) a viewer may be prompted with one memory drawn
//! from the room's candidate pool. Two independent markers gate the flow:
//! "prompt shown today" (set at display time, also by a dismissal) and
//! "memory revealed today" (set only by a cherish). Which memories form the
//! pool is governed by the configured [`RevealPoolPolicy`]; the historically
//! observed pool draws from already-revealed memories, the `Unrevealed`
//! policy gives the more plausible pool, and the flow works with either.

use chrono::Utc;
use rand::Rng;
use tracing::{info, instrument, warn};

use tandem_common::RevealPoolPolicy;
use tandem_core::entities::Memory;
use tandem_core::events::{ChangeEvent, ChangeKind};
use tandem_core::traits::{DailyMarker, MarkerKind};
use tandem_core::value_objects::{MemoryId, RoomId, UserId};

use crate::services::{ServiceContext, ServiceResult};

/// Source of the uniform draw over the candidate pool.
///
/// Behind a trait so tests can pin the drawn index.
pub trait RevealRng: Send + Sync {
    /// Draw an index in `0..len`; `len` is never zero
    fn draw(&self, len: usize) -> usize;
}

/// Thread-local RNG draw, the production implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDraw;

impl RevealRng for ThreadRngDraw {
    fn draw(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Outcome of the daily check-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealCheck {
    /// The prompt was already shown to this viewer today; terminal
    AlreadyShownToday,
    /// The candidate pool is empty; no prompt
    NoCandidate,
    /// One memory drawn for today's prompt
    Candidate(Memory),
}

/// Per-(room, viewer) daily reveal flow
pub struct DailyRevealFlow<'a> {
    ctx: &'a ServiceContext,
    room_id: RoomId,
    viewer: UserId,
}

impl<'a> DailyRevealFlow<'a> {
    /// Create a flow for one viewer in one room
    pub fn new(ctx: &'a ServiceContext, room_id: RoomId, viewer: UserId) -> Self {
        Self {
            ctx,
            room_id,
            viewer,
        }
    }

    fn marker(&self, kind: MarkerKind) -> DailyMarker {
        DailyMarker::today(kind, self.room_id, self.viewer)
    }

    /// Run the daily check: either the viewer was already prompted today, or
    /// a candidate is drawn (and the prompt-shown marker set), or the pool
    /// is empty.
    #[instrument(skip(self))]
    pub async fn check_in(&self) -> ServiceResult<RevealCheck> {
        let shown = self.marker(MarkerKind::PromptShown);

        if self.ctx.dedupe_store().is_set(&shown).await? {
            return Ok(RevealCheck::AlreadyShownToday);
        }

        // Marked before the pool query: a second check-in today must not
        // re-prompt even if this one ends with no candidate.
        self.ctx.dedupe_store().set(&shown).await?;

        let pool = match self.ctx.reveal_policy() {
            RevealPoolPolicy::Revealed => self.ctx.memory_repo().find_revealed(self.room_id).await?,
            RevealPoolPolicy::Unrevealed => {
                self.ctx.memory_repo().find_unrevealed(self.room_id).await?
            }
        };

        if pool.is_empty() {
            return Ok(RevealCheck::NoCandidate);
        }

        let index = self.ctx.reveal_rng().draw(pool.len());
        let memory = pool
            .into_iter()
            .nth(index)
            .ok_or_else(|| crate::services::ServiceError::internal("reveal draw out of range"))?;

        info!(memory_id = %memory.id, room_id = %self.room_id, "Daily memory drawn");
        Ok(RevealCheck::Candidate(memory))
    }

    /// Cherish today's memory: stamp `revealed_at` (sticky, exactly once)
    /// and set the revealed-today marker. Terminal for the day.
    #[instrument(skip(self))]
    pub async fn cherish(&self, memory_id: MemoryId) -> ServiceResult<()> {
        let transitioned = self
            .ctx
            .memory_repo()
            .mark_revealed(memory_id, Utc::now())
            .await?;

        if transitioned {
            if let Err(e) = self
                .ctx
                .publisher()
                .publish(&ChangeEvent::MemoriesChanged {
                    room_id: self.room_id,
                    kind: ChangeKind::Update,
                })
                .await
            {
                warn!(error = %e, room_id = %self.room_id, "Failed to publish reveal");
            }
        }

        self.ctx
            .dedupe_store()
            .set(&self.marker(MarkerKind::MemoryRevealed))
            .await?;

        info!(memory_id = %memory_id, transitioned, "Memory cherished");
        Ok(())
    }

    /// Dismiss today's prompt without revealing.
    ///
    /// The prompt-shown marker set at check-in keeps the prompt away until
    /// the next UTC day; re-setting it here covers a dismissal reached
    /// through a stale session.
    #[instrument(skip(self))]
    pub async fn dismiss(&self) -> ServiceResult<()> {
        self.ctx
            .dedupe_store()
            .set(&self.marker(MarkerKind::PromptShown))
            .await?;

        info!(room_id = %self.room_id, "Daily prompt dismissed");
        Ok(())
    }
}
