//! Presence upsert and staleness-window tests

use chrono::{Duration, Utc};

use integration_tests::{paired_room, solo_room, TestHarness};
use tandem_core::entities::PresenceRecord;
use tandem_core::value_objects::UserId;
use tandem_core::DomainError;
use tandem_service::{PresenceService, ServiceError};

// ============================================================================
// Upsert Tests
// ============================================================================

#[tokio::test]
async fn test_repeated_entry_keeps_one_record() {
    let harness = TestHarness::new();
    let (room, creator) = solo_room(&harness).await;
    let service = PresenceService::new(&harness.ctx);

    service.enter_room(room.id, creator).await.unwrap();
    service.enter_room(room.id, creator).await.unwrap();
    service.heartbeat(room.id, creator).await.unwrap();

    assert_eq!(harness.presence.record_count(), 1);
    let record = harness.presence.get(creator, room.id).unwrap();
    assert!(record.is_online);
}

#[tokio::test]
async fn test_leave_room_marks_offline() {
    let harness = TestHarness::new();
    let (room, creator) = solo_room(&harness).await;
    let service = PresenceService::new(&harness.ctx);

    service.enter_room(room.id, creator).await.unwrap();
    service.leave_room(room.id, creator).await.unwrap();

    assert_eq!(harness.presence.record_count(), 1);
    let record = harness.presence.get(creator, room.id).unwrap();
    assert!(!record.is_online);
}

#[tokio::test]
async fn test_enter_requires_membership() {
    let harness = TestHarness::new();
    let (room, _, _) = paired_room(&harness).await;

    let err = PresenceService::new(&harness.ctx)
        .enter_room(room.id, UserId::generate())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MemberNotFound)
    ));
}

#[tokio::test]
async fn test_heartbeat_requires_membership() {
    let harness = TestHarness::new();
    let (room, _, _) = paired_room(&harness).await;

    let err = PresenceService::new(&harness.ctx)
        .heartbeat(room.id, UserId::generate())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::MemberNotFound)
    ));
    // No presence row for the outsider
    assert_eq!(harness.presence.record_count(), 0);
}

// ============================================================================
// Partner Online Tests
// ============================================================================

#[tokio::test]
async fn test_partner_online_excludes_own_record() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;
    let service = PresenceService::new(&harness.ctx);

    service.enter_room(room.id, a).await.unwrap();

    // Only the viewer is online; their own record must not count
    assert!(!service.partner_online(room.id, a).await.unwrap());
    assert!(service.partner_online(room.id, b).await.unwrap());
}

#[tokio::test]
async fn test_missing_partner_record_reads_offline() {
    let harness = TestHarness::new();
    let (room, creator) = solo_room(&harness).await;

    let online = PresenceService::new(&harness.ctx)
        .partner_online(room.id, creator)
        .await
        .unwrap();

    assert!(!online);
}

#[tokio::test]
async fn test_stale_online_record_reads_offline() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    // Partner vanished without an exit write; the flag still says online
    harness.presence.seed(PresenceRecord {
        user_id: b,
        room_id: room.id,
        is_online: true,
        last_seen: Utc::now() - Duration::seconds(600),
    });

    let online = PresenceService::new(&harness.ctx)
        .partner_online(room.id, a)
        .await
        .unwrap();

    assert!(!online);
}

#[tokio::test]
async fn test_fresh_record_within_ttl_reads_online() {
    let harness = TestHarness::new();
    let (room, a, b) = paired_room(&harness).await;

    harness.presence.seed(PresenceRecord {
        user_id: b,
        room_id: room.id,
        is_online: true,
        last_seen: Utc::now() - Duration::seconds(60),
    });

    let online = PresenceService::new(&harness.ctx)
        .partner_online(room.id, a)
        .await
        .unwrap();

    assert!(online);
}
