//! Live room session.
//!
//! One session per open room view. Opening a session marks the user online,
//! takes initial snapshots, and spawns a router task that consumes the
//! room's change feed. Each state slice has exactly one writer - the router:
//!
//! - `partner_online` and `memories` are invalidate-and-refetch slices; the
//!   matching events carry no data and trigger a full re-query.
//! - `nudge_visible` consumes the nudge payload directly: a nudge addressed
//!   to this viewer sets the flag and (re)arms a timer that clears it.
//!
//! `close()` performs the offline upsert and releases the subscription;
//! dropping the session aborts the router and any armed timer.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use tandem_core::entities::Memory;
use tandem_core::events::ChangeEvent;
use tandem_core::traits::{ChangeFeed, FeedError};
use tandem_core::value_objects::{RoomId, UserId};

use crate::services::{PresenceService, RoomService, ServiceContext, ServiceResult};

use super::stale_cell::StaleCell;

/// Handle to an open live room session
pub struct RoomSession {
    room_id: RoomId,
    user_id: UserId,
    ctx: ServiceContext,
    partner_online: watch::Receiver<bool>,
    memories: watch::Receiver<Vec<Memory>>,
    nudge_visible: watch::Receiver<bool>,
    router: Option<JoinHandle<()>>,
}

impl RoomSession {
    /// Open a session: go online, subscribe, snapshot, start the router.
    ///
    /// The subscription is opened before the initial snapshots so a write
    /// landing in between is still observed as an invalidation.
    #[instrument(skip(ctx))]
    pub async fn open(ctx: ServiceContext, room_id: RoomId, user_id: UserId) -> ServiceResult<Self> {
        RoomService::new(&ctx).require_member(room_id, user_id).await?;
        PresenceService::new(&ctx).enter_room(room_id, user_id).await?;

        let feed = match ctx.change_stream().subscribe(room_id).await {
            Ok(feed) => feed,
            Err(e) => {
                Self::rollback_open(&ctx, room_id, user_id, false).await;
                return Err(e.into());
            }
        };

        let snapshots = async {
            let memories = ctx.memory_repo().find_by_room(room_id).await?;
            let partner_online = PresenceService::new(&ctx)
                .partner_online(room_id, user_id)
                .await?;
            Ok::<_, crate::services::ServiceError>((memories, partner_online))
        };
        let (memories, partner_online) = match snapshots.await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                Self::rollback_open(&ctx, room_id, user_id, true).await;
                return Err(e);
            }
        };

        let (memories_cell, memories_rx) = StaleCell::new(memories);
        let (partner_cell, partner_rx) = StaleCell::new(partner_online);
        let (nudge_tx, nudge_rx) = watch::channel(false);

        let router = tokio::spawn(router_loop(
            ctx.clone(),
            room_id,
            user_id,
            feed,
            memories_cell,
            partner_cell,
            nudge_tx,
        ));

        info!(room_id = %room_id, user_id = %user_id, "Room session opened");

        Ok(Self {
            room_id,
            user_id,
            ctx,
            partner_online: partner_rx,
            memories: memories_rx,
            nudge_visible: nudge_rx,
            router: Some(router),
        })
    }

    /// The room this session is attached to
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// The viewer this session belongs to
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current effective partner-online state
    pub fn partner_online(&self) -> bool {
        *self.partner_online.borrow()
    }

    /// Current memory list snapshot, newest first
    pub fn memories(&self) -> Vec<Memory> {
        self.memories.borrow().clone()
    }

    /// Whether a nudge is currently visible
    pub fn nudge_visible(&self) -> bool {
        *self.nudge_visible.borrow()
    }

    /// Watch the partner-online slice
    pub fn watch_partner_online(&self) -> watch::Receiver<bool> {
        self.partner_online.clone()
    }

    /// Watch the memory list slice
    pub fn watch_memories(&self) -> watch::Receiver<Vec<Memory>> {
        self.memories.clone()
    }

    /// Watch the nudge visibility flag
    pub fn watch_nudge_visible(&self) -> watch::Receiver<bool> {
        self.nudge_visible.clone()
    }

    /// Undo the partial effects of a failed `open`: the subscription must not
    /// outlive the session it was opened for, and the entry upsert is rolled
    /// back so the user does not read as online without a session.
    async fn rollback_open(ctx: &ServiceContext, room_id: RoomId, user_id: UserId, subscribed: bool) {
        if subscribed {
            if let Err(e) = ctx.change_stream().unsubscribe(room_id).await {
                warn!(error = %e, room_id = %room_id, "Failed to release subscription after open error");
            }
        }
        if let Err(e) = PresenceService::new(ctx).leave_room(room_id, user_id).await {
            warn!(error = %e, room_id = %room_id, "Failed to go offline after open error");
        }
    }

    /// Close the session: stop the router, go offline, release the
    /// subscription.
    ///
    /// Both teardown steps run even if the first fails; the subscription is
    /// never left held because the offline upsert errored.
    #[instrument(skip(self), fields(room_id = %self.room_id, user_id = %self.user_id))]
    pub async fn close(mut self) -> ServiceResult<()> {
        if let Some(router) = self.router.take() {
            router.abort();
        }

        let offline = PresenceService::new(&self.ctx)
            .leave_room(self.room_id, self.user_id)
            .await;
        let released = self.ctx.change_stream().unsubscribe(self.room_id).await;

        offline?;
        released?;

        info!("Room session closed");
        Ok(())
    }
}

impl Drop for RoomSession {
    fn drop(&mut self) {
        // Abort-only teardown for sessions dropped without close(); the
        // presence record goes stale and reads as offline after the TTL.
        if let Some(router) = self.router.take() {
            router.abort();
        }
    }
}

impl std::fmt::Debug for RoomSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomSession")
            .field("room_id", &self.room_id)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Router task: the single writer of all three state slices
async fn router_loop(
    ctx: ServiceContext,
    room_id: RoomId,
    user_id: UserId,
    mut feed: ChangeFeed,
    memories_cell: StaleCell<Vec<Memory>>,
    partner_cell: StaleCell<bool>,
    nudge_tx: watch::Sender<bool>,
) {
    // Armed auto-dismiss timer for the visible nudge, if any
    let mut nudge_timer: Option<JoinHandle<()>> = None;

    loop {
        match feed.recv().await {
            Ok(ChangeEvent::MemoriesChanged { .. }) => {
                refresh_memories(&ctx, room_id, &memories_cell).await;
            }
            Ok(ChangeEvent::PresenceChanged { .. }) => {
                refresh_partner(&ctx, room_id, user_id, &partner_cell).await;
            }
            Ok(ChangeEvent::NudgeSent { nudge }) => {
                // Trusted payload; mis-addressed nudges never touch the flag
                if !nudge.is_addressed_to(user_id) {
                    continue;
                }

                if let Some(timer) = nudge_timer.take() {
                    timer.abort();
                }
                nudge_tx.send_replace(true);

                let tx = nudge_tx.clone();
                let visible_ms = ctx.nudge_visible_ms();
                nudge_timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(tokio::time::Duration::from_millis(visible_ms)).await;
                    tx.send_replace(false);
                }));

                debug!(room_id = %room_id, "Nudge visible");
            }
            Err(FeedError::Lagged(n)) => {
                // Events were dropped: everything may have changed
                warn!(dropped = n, room_id = %room_id, "Feed lagged, re-querying all slices");
                refresh_memories(&ctx, room_id, &memories_cell).await;
                refresh_partner(&ctx, room_id, user_id, &partner_cell).await;
            }
            Err(FeedError::Closed) => {
                warn!(room_id = %room_id, "Change feed closed, router stopping");
                break;
            }
        }
    }

    if let Some(timer) = nudge_timer.take() {
        timer.abort();
    }
}

async fn refresh_memories(ctx: &ServiceContext, room_id: RoomId, cell: &StaleCell<Vec<Memory>>) {
    if let Err(e) = cell
        .refresh(|| ctx.memory_repo().find_by_room(room_id))
        .await
    {
        // Keep the stale snapshot; the next invalidation retries
        warn!(error = %e, room_id = %room_id, "Failed to refresh memory list");
    }
}

async fn refresh_partner(
    ctx: &ServiceContext,
    room_id: RoomId,
    user_id: UserId,
    cell: &StaleCell<bool>,
) {
    if let Err(e) = cell
        .refresh(|| async {
            PresenceService::new(ctx).partner_online(room_id, user_id).await
        })
        .await
    {
        warn!(error = %e, room_id = %room_id, "Failed to refresh partner presence");
    }
}
