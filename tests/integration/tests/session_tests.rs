//! Live room session tests
//!
//! These run on the paused tokio clock so the nudge timer is deterministic:
//! the clock only moves via explicit `advance` calls or auto-advance while
//! every task is idle.

use tokio::time::{advance, Duration};

use integration_tests::{paired_room, solo_room, TestHarness};
use tandem_core::DomainError;
use tandem_service::{MemoryService, NudgeService, PresenceService, RoomSession, ServiceError};

// ============================================================================
// Nudge Service Tests
// ============================================================================

#[tokio::test]
async fn test_nudge_requires_a_joined_partner() {
    let harness = TestHarness::new();
    let (room, creator) = solo_room(&harness).await;

    let err = NudgeService::new(&harness.ctx)
        .send_nudge(room.id, creator)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MemberNotFound)
    ));
    assert!(harness.nudges.all().is_empty());
}

#[tokio::test]
async fn test_rapid_nudges_append_distinct_rows() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;
    let service = NudgeService::new(&harness.ctx);

    // No coalescing, no rate limit
    service.send_nudge(room.id, a).await.unwrap();
    service.send_nudge(room.id, a).await.unwrap();

    let rows = harness.nudges.all();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|n| n.from_user_id == a && n.to_user_id == b));
}

// ============================================================================
// Nudge Delivery Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_nudge_becomes_visible_then_auto_clears() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();
    let mut visible = session.watch_nudge_visible();

    NudgeService::new(&harness.ctx).send_nudge(room.id, a).await.unwrap();

    visible.changed().await.unwrap();
    assert!(*visible.borrow_and_update());

    // Auto-advance jumps straight to the timer deadline
    let armed_at = tokio::time::Instant::now();
    visible.changed().await.unwrap();
    assert!(!*visible.borrow_and_update());
    assert!(armed_at.elapsed() >= Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_second_nudge_rearms_the_timer() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();
    let mut visible = session.watch_nudge_visible();
    let service = NudgeService::new(&harness.ctx);

    service.send_nudge(room.id, a).await.unwrap();
    visible.changed().await.unwrap();
    assert!(*visible.borrow_and_update());

    advance(Duration::from_millis(500)).await;

    service.send_nudge(room.id, a).await.unwrap();
    visible.changed().await.unwrap();
    assert!(*visible.borrow_and_update());

    // The first deadline (t=3000) passes without clearing the flag
    advance(Duration::from_millis(2999)).await;
    assert!(*visible.borrow_and_update());

    // The re-armed deadline (t=3500) does
    visible.changed().await.unwrap();
    assert!(!*visible.borrow_and_update());

    assert_eq!(harness.nudges.all().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_nudge_for_the_partner_stays_invisible_to_the_sender() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, a).await.unwrap();

    NudgeService::new(&harness.ctx).send_nudge(room.id, a).await.unwrap();

    // Let the router drain the feed
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!session.nudge_visible());
    assert_eq!(harness.nudges.all().len(), 1);
}

// ============================================================================
// Invalidation Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_partner_write_refreshes_memory_snapshot() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();
    assert!(session.memories().is_empty());

    let mut memories = session.watch_memories();

    MemoryService::new(&harness.ctx)
        .add_memory(room.id, a, "Sunset at the pier", tandem_core::Emotion::Peaceful)
        .await
        .unwrap();

    memories.changed().await.unwrap();
    let snapshot = memories.borrow_and_update().clone();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].content, "Sunset at the pier");
}

#[tokio::test(start_paused = true)]
async fn test_partner_presence_flips_the_online_slice() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();
    assert!(!session.partner_online());

    let mut online = session.watch_partner_online();
    let presence = PresenceService::new(&harness.ctx);

    presence.enter_room(room.id, a).await.unwrap();
    online.changed().await.unwrap();
    assert!(*online.borrow_and_update());

    presence.leave_room(room.id, a).await.unwrap();
    online.changed().await.unwrap();
    assert!(!*online.borrow_and_update());
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_open_marks_online_and_snapshots() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    PresenceService::new(&harness.ctx).enter_room(room.id, a).await.unwrap();

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();

    let record = harness.presence.get(b, room.id).unwrap();
    assert!(record.is_online);
    assert!(session.partner_online());
}

#[tokio::test]
async fn test_open_requires_membership() {
    let harness = TestHarness::new();
    let (room, _, _) = paired_room(&harness).await;

    let err = RoomSession::open(
        harness.ctx.clone(),
        room.id,
        tandem_core::value_objects::UserId::generate(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MemberNotFound)
    ));
}

#[tokio::test]
async fn test_close_goes_offline_and_releases_the_subscription() {
    let harness = TestHarness::new();
    let (room, _, b) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();
    session.close().await.unwrap();

    let record = harness.presence.get(b, room.id).unwrap();
    assert!(!record.is_online);
    assert_eq!(harness.bus.unsubscribe_count(), 1);
}

#[tokio::test]
async fn test_failed_open_rolls_back_subscription_and_presence() {
    let harness = TestHarness::new();
    let (room, _, b) = paired_room(&harness).await;

    // The initial memory snapshot fails after the subscription is open
    harness.memories.set_fail_reads(true);

    let err = RoomSession::open(harness.ctx.clone(), room.id, b)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::StoreUnavailable(_))
    ));
    assert_eq!(harness.bus.unsubscribe_count(), 1);
    let record = harness.presence.get(b, room.id).unwrap();
    assert!(!record.is_online);
}

#[tokio::test]
async fn test_close_releases_the_subscription_when_the_offline_write_fails() {
    let harness = TestHarness::new();
    let (room, _, b) = paired_room(&harness).await;

    let session = RoomSession::open(harness.ctx.clone(), room.id, b).await.unwrap();
    harness.presence.set_fail_writes(true);

    let err = session.close().await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::StoreUnavailable(_))
    ));
    assert_eq!(harness.bus.unsubscribe_count(), 1);
}
