//! Daily reveal flow tests

use std::sync::Arc;

use chrono::{Duration, Utc};

use integration_tests::{memory_aged, paired_room, FixedDraw, HarnessConfig, TestHarness};
use tandem_common::RevealPoolPolicy;
use tandem_core::events::{ChangeEvent, ChangeKind};
use tandem_core::traits::{ChangeStream, DailyMarker, DedupeStore, MarkerKind, MemoryRepository};
use tandem_core::value_objects::MemoryId;
use tandem_core::DomainError;
use tandem_service::{DailyRevealFlow, RevealCheck, ServiceError};

// ============================================================================
// Check-in Tests
// ============================================================================

#[tokio::test]
async fn test_default_pool_draws_from_revealed_memories() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    harness.memories.seed(memory_aged(
        room.id,
        a,
        "revealed",
        Duration::hours(2),
        Some(Utc::now() - Duration::hours(1)),
    ));
    harness
        .memories
        .seed(memory_aged(room.id, a, "hidden", Duration::hours(1), None));

    let check = DailyRevealFlow::new(&harness.ctx, room.id, a)
        .check_in()
        .await
        .unwrap();

    match check {
        RevealCheck::Candidate(memory) => assert_eq!(memory.content, "revealed"),
        other => panic!("expected a candidate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unrevealed_policy_draws_from_hidden_memories() {
    let harness = TestHarness::with_config(HarnessConfig {
        reveal_policy: RevealPoolPolicy::Unrevealed,
        reveal_rng: Arc::new(FixedDraw(1)),
        ..HarnessConfig::default()
    });
    let (room, a, _) = paired_room(&harness).await;

    // Pool is newest first: [fresh, older]; index 1 lands on "older"
    harness
        .memories
        .seed(memory_aged(room.id, a, "fresh", Duration::hours(1), None));
    harness
        .memories
        .seed(memory_aged(room.id, a, "older", Duration::hours(2), None));
    harness.memories.seed(memory_aged(
        room.id,
        a,
        "already revealed",
        Duration::hours(3),
        Some(Utc::now()),
    ));

    let check = DailyRevealFlow::new(&harness.ctx, room.id, a)
        .check_in()
        .await
        .unwrap();

    match check {
        RevealCheck::Candidate(memory) => assert_eq!(memory.content, "older"),
        other => panic!("expected a candidate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_check_in_today_is_suppressed() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    harness.memories.seed(memory_aged(
        room.id,
        a,
        "revealed",
        Duration::hours(1),
        Some(Utc::now()),
    ));

    let flow = DailyRevealFlow::new(&harness.ctx, room.id, a);
    assert!(matches!(
        flow.check_in().await.unwrap(),
        RevealCheck::Candidate(_)
    ));
    assert_eq!(
        flow.check_in().await.unwrap(),
        RevealCheck::AlreadyShownToday
    );
}

#[tokio::test]
async fn test_empty_pool_still_suppresses_reprompt() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    let flow = DailyRevealFlow::new(&harness.ctx, room.id, a);

    // No candidate today, and no second prompt either
    assert_eq!(flow.check_in().await.unwrap(), RevealCheck::NoCandidate);
    assert_eq!(
        flow.check_in().await.unwrap(),
        RevealCheck::AlreadyShownToday
    );
}

#[tokio::test]
async fn test_markers_are_scoped_per_viewer() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    harness.memories.seed(memory_aged(
        room.id,
        a,
        "revealed",
        Duration::hours(1),
        Some(Utc::now()),
    ));

    // One partner checking in does not consume the other's prompt
    DailyRevealFlow::new(&harness.ctx, room.id, a)
        .check_in()
        .await
        .unwrap();

    assert!(matches!(
        DailyRevealFlow::new(&harness.ctx, room.id, b)
            .check_in()
            .await
            .unwrap(),
        RevealCheck::Candidate(_)
    ));
}

// ============================================================================
// Cherish Tests
// ============================================================================

#[tokio::test]
async fn test_cherish_stamps_revealed_at_once() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    harness
        .memories
        .seed(memory_aged(room.id, a, "hidden", Duration::hours(1), None));
    let memory_id = harness.ctx.memory_repo().find_by_room(room.id).await.unwrap()[0].id;

    let flow = DailyRevealFlow::new(&harness.ctx, room.id, a);
    flow.cherish(memory_id).await.unwrap();

    let first_stamp = harness.ctx.memory_repo().find_by_room(room.id).await.unwrap()[0]
        .revealed_at
        .expect("revealed_at is set");

    // A second cherish is a no-op that keeps the original timestamp
    flow.cherish(memory_id).await.unwrap();
    let second_stamp = harness.ctx.memory_repo().find_by_room(room.id).await.unwrap()[0]
        .revealed_at
        .unwrap();

    assert_eq!(first_stamp, second_stamp);
}

#[tokio::test]
async fn test_cherish_sets_the_revealed_marker() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    harness
        .memories
        .seed(memory_aged(room.id, a, "hidden", Duration::hours(1), None));
    let memory_id = harness.ctx.memory_repo().find_by_room(room.id).await.unwrap()[0].id;

    DailyRevealFlow::new(&harness.ctx, room.id, a)
        .cherish(memory_id)
        .await
        .unwrap();

    let marker = DailyMarker::today(MarkerKind::MemoryRevealed, room.id, a);
    assert!(harness.dedupe.is_set(&marker).await.unwrap());
}

#[tokio::test]
async fn test_cherish_publishes_invalidation_on_transition() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    harness
        .memories
        .seed(memory_aged(room.id, a, "hidden", Duration::hours(1), None));
    let memory_id = harness.ctx.memory_repo().find_by_room(room.id).await.unwrap()[0].id;

    let mut feed = harness.ctx.change_stream().subscribe(room.id).await.unwrap();

    DailyRevealFlow::new(&harness.ctx, room.id, a)
        .cherish(memory_id)
        .await
        .unwrap();

    assert_eq!(
        feed.recv().await.unwrap(),
        ChangeEvent::MemoriesChanged {
            room_id: room.id,
            kind: ChangeKind::Update,
        }
    );
}

#[tokio::test]
async fn test_cherish_unknown_memory_is_an_error() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    let err = DailyRevealFlow::new(&harness.ctx, room.id, a)
        .cherish(MemoryId::generate())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MemoryNotFound(_))
    ));
}

// ============================================================================
// Dismiss Tests
// ============================================================================

#[tokio::test]
async fn test_dismiss_keeps_the_prompt_away_without_revealing() {
    let harness = TestHarness::new();
    let (room, a, _) = paired_room(&harness).await;

    harness.memories.seed(memory_aged(
        room.id,
        a,
        "revealed",
        Duration::hours(1),
        Some(Utc::now()),
    ));

    let flow = DailyRevealFlow::new(&harness.ctx, room.id, a);
    assert!(matches!(
        flow.check_in().await.unwrap(),
        RevealCheck::Candidate(_)
    ));

    flow.dismiss().await.unwrap();

    assert_eq!(
        flow.check_in().await.unwrap(),
        RevealCheck::AlreadyShownToday
    );

    // Dismissing never counts as a reveal
    let revealed = DailyMarker::today(MarkerKind::MemoryRevealed, room.id, a);
    assert!(!harness.dedupe.is_set(&revealed).await.unwrap());
}
