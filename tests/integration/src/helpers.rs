//! In-memory port implementations for integration tests
//!
//! Each fake mirrors the production implementation's contract: upsert
//! semantics, exactly-once reveal transitions, newest-first ordering, and an
//! in-process bridge from the publish side of the bus to the subscribe side.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use tandem_common::RevealPoolPolicy;
use tandem_core::entities::{Memory, NudgeEvent, PresenceRecord, Room, RoomMember};
use tandem_core::error::DomainError;
use tandem_core::events::ChangeEvent;
use tandem_core::traits::{
    ChangeFeed, ChangePublisher, ChangeStream, DailyMarker, DedupeStore, MemberRepository,
    MemoryRepository, NudgeRepository, PresenceRepository, RepoResult, RoomRepository,
};
use tandem_core::value_objects::{JoinCode, MemoryId, RoomId, UserId};
use tandem_service::{RevealRng, ServiceContext, ServiceContextBuilder};

// ============================================================================
// Repositories
// ============================================================================

/// In-memory RoomRepository
#[derive(Default)]
pub struct MemRoomRepository {
    rooms: Mutex<Vec<Room>>,
}

#[async_trait]
impl RoomRepository for MemRoomRepository {
    async fn find_by_id(&self, id: RoomId) -> RepoResult<Option<Room>> {
        Ok(self.rooms.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_join_code(&self, code: &JoinCode) -> RepoResult<Option<Room>> {
        Ok(self
            .rooms
            .lock()
            .iter()
            .find(|r| r.join_code == *code)
            .cloned())
    }

    async fn find_by_user(&self, _user_id: UserId) -> RepoResult<Vec<Room>> {
        // The membership join lives in SQL; this fake has no edge table and
        // returns every room.
        Ok(self.rooms.lock().clone())
    }

    async fn create(&self, room: &Room) -> RepoResult<()> {
        let mut rooms = self.rooms.lock();
        if rooms.iter().any(|r| r.join_code == room.join_code) {
            return Err(DomainError::JoinCodeExists);
        }
        rooms.push(room.clone());
        Ok(())
    }
}

/// In-memory MemberRepository
#[derive(Default)]
pub struct MemMemberRepository {
    members: Mutex<Vec<RoomMember>>,
}

#[async_trait]
impl MemberRepository for MemMemberRepository {
    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<RoomMember>> {
        let mut members: Vec<_> = self
            .members
            .lock()
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn is_member(&self, room_id: RoomId, user_id: UserId) -> RepoResult<bool> {
        Ok(self
            .members
            .lock()
            .iter()
            .any(|m| m.room_id == room_id && m.user_id == user_id))
    }

    async fn add(&self, member: &RoomMember) -> RepoResult<()> {
        let mut members = self.members.lock();
        if members
            .iter()
            .any(|m| m.room_id == member.room_id && m.user_id == member.user_id)
        {
            return Err(DomainError::AlreadyMember);
        }
        members.push(member.clone());
        Ok(())
    }
}

/// In-memory MemoryRepository
#[derive(Default)]
pub struct MemMemoryRepository {
    memories: Mutex<Vec<Memory>>,
    fail_reads: AtomicBool,
}

impl MemMemoryRepository {
    /// Seed a memory directly, bypassing the service validation
    pub fn seed(&self, memory: Memory) {
        self.memories.lock().push(memory);
    }

    /// Make every read return `StoreUnavailable` until cleared
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> RepoResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable("memory reads disabled".into()));
        }
        Ok(())
    }

    fn sorted_filtered<F: Fn(&Memory) -> bool>(&self, room_id: RoomId, keep: F) -> Vec<Memory> {
        let mut result: Vec<_> = self
            .memories
            .lock()
            .iter()
            .filter(|m| m.room_id == room_id && keep(m))
            .cloned()
            .collect();
        // Newest first, like the production query
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }
}

#[async_trait]
impl MemoryRepository for MemMemoryRepository {
    async fn insert(&self, memory: &Memory) -> RepoResult<()> {
        self.memories.lock().push(memory.clone());
        Ok(())
    }

    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<Memory>> {
        self.check_reads()?;
        Ok(self.sorted_filtered(room_id, |_| true))
    }

    async fn find_revealed(&self, room_id: RoomId) -> RepoResult<Vec<Memory>> {
        self.check_reads()?;
        Ok(self.sorted_filtered(room_id, Memory::is_revealed))
    }

    async fn find_unrevealed(&self, room_id: RoomId) -> RepoResult<Vec<Memory>> {
        self.check_reads()?;
        Ok(self.sorted_filtered(room_id, |m| !m.is_revealed()))
    }

    async fn mark_revealed(&self, id: MemoryId, revealed_at: DateTime<Utc>) -> RepoResult<bool> {
        let mut memories = self.memories.lock();
        let memory = memories
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MemoryNotFound(id))?;
        Ok(memory.reveal(revealed_at))
    }
}

/// In-memory PresenceRepository with upsert semantics
#[derive(Default)]
pub struct MemPresenceRepository {
    records: Mutex<HashMap<(UserId, RoomId), PresenceRecord>>,
    fail_writes: AtomicBool,
}

impl MemPresenceRepository {
    /// Make every upsert return `StoreUnavailable` until cleared
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored records (one per key if upsert holds)
    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Seed a record directly (e.g. with a back-dated `last_seen`)
    pub fn seed(&self, record: PresenceRecord) {
        self.records
            .lock()
            .insert((record.user_id, record.room_id), record);
    }

    /// Fetch one record by key
    pub fn get(&self, user_id: UserId, room_id: RoomId) -> Option<PresenceRecord> {
        self.records.lock().get(&(user_id, room_id)).cloned()
    }
}

#[async_trait]
impl PresenceRepository for MemPresenceRepository {
    async fn upsert(&self, record: &PresenceRecord) -> RepoResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable(
                "presence writes disabled".into(),
            ));
        }
        self.records
            .lock()
            .insert((record.user_id, record.room_id), record.clone());
        Ok(())
    }

    async fn find_by_room(&self, room_id: RoomId) -> RepoResult<Vec<PresenceRecord>> {
        Ok(self
            .records
            .lock()
            .values()
            .filter(|r| r.room_id == room_id)
            .cloned()
            .collect())
    }
}

/// In-memory NudgeRepository (append-only)
#[derive(Default)]
pub struct MemNudgeRepository {
    nudges: Mutex<Vec<NudgeEvent>>,
}

impl MemNudgeRepository {
    /// All stored nudge rows
    pub fn all(&self) -> Vec<NudgeEvent> {
        self.nudges.lock().clone()
    }
}

#[async_trait]
impl NudgeRepository for MemNudgeRepository {
    async fn insert(&self, nudge: &NudgeEvent) -> RepoResult<()> {
        self.nudges.lock().push(nudge.clone());
        Ok(())
    }
}

// ============================================================================
// Change bus
// ============================================================================

/// In-process bridge between the publish and subscribe sides of the bus.
///
/// Published events land on a broadcast channel shared by all feeds; each
/// feed filters down to its room exactly like the Redis-backed transport.
pub struct MemChangeBus {
    tx: broadcast::Sender<ChangeEvent>,
    unsubscribes: AtomicUsize,
}

impl MemChangeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            tx,
            unsubscribes: AtomicUsize::new(0),
        }
    }

    /// How many unsubscribe calls teardown performed
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }
}

impl Default for MemChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeStream for MemChangeBus {
    async fn subscribe(&self, room_id: RoomId) -> RepoResult<ChangeFeed> {
        Ok(ChangeFeed::new(room_id, self.tx.subscribe()))
    }

    async fn unsubscribe(&self, _room_id: RoomId) -> RepoResult<()> {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ChangePublisher for MemChangeBus {
    async fn publish(&self, event: &ChangeEvent) -> RepoResult<()> {
        // No receivers is fine; nobody is watching the room
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}

// ============================================================================
// Dedupe store and RNG
// ============================================================================

/// In-memory DedupeStore keyed by the marker's storage key
#[derive(Default)]
pub struct MemDedupeStore {
    keys: Mutex<HashSet<String>>,
}

#[async_trait]
impl DedupeStore for MemDedupeStore {
    async fn is_set(&self, marker: &DailyMarker) -> RepoResult<bool> {
        Ok(self.keys.lock().contains(&marker.key()))
    }

    async fn set(&self, marker: &DailyMarker) -> RepoResult<()> {
        self.keys.lock().insert(marker.key());
        Ok(())
    }
}

/// RevealRng returning a fixed index (clamped to the pool)
pub struct FixedDraw(pub usize);

impl RevealRng for FixedDraw {
    fn draw(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A wired-up in-memory context plus handles to the underlying fakes
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub rooms: Arc<MemRoomRepository>,
    pub members: Arc<MemMemberRepository>,
    pub memories: Arc<MemMemoryRepository>,
    pub presence: Arc<MemPresenceRepository>,
    pub nudges: Arc<MemNudgeRepository>,
    pub bus: Arc<MemChangeBus>,
    pub dedupe: Arc<MemDedupeStore>,
}

/// Knobs a test can override before wiring the harness
pub struct HarnessConfig {
    pub presence_ttl_seconds: u64,
    pub nudge_visible_ms: u64,
    pub reveal_policy: RevealPoolPolicy,
    pub reveal_rng: Arc<dyn RevealRng>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            presence_ttl_seconds: 300,
            nudge_visible_ms: 3000,
            reveal_policy: RevealPoolPolicy::default(),
            reveal_rng: Arc::new(FixedDraw(0)),
        }
    }
}

impl TestHarness {
    /// Wire a harness with default knobs
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    /// Wire a harness with custom knobs
    pub fn with_config(config: HarnessConfig) -> Self {
        let rooms = Arc::new(MemRoomRepository::default());
        let members = Arc::new(MemMemberRepository::default());
        let memories = Arc::new(MemMemoryRepository::default());
        let presence = Arc::new(MemPresenceRepository::default());
        let nudges = Arc::new(MemNudgeRepository::default());
        let bus = Arc::new(MemChangeBus::new());
        let dedupe = Arc::new(MemDedupeStore::default());

        let ctx = ServiceContextBuilder::new()
            .room_repo(rooms.clone())
            .member_repo(members.clone())
            .memory_repo(memories.clone())
            .presence_repo(presence.clone())
            .nudge_repo(nudges.clone())
            .change_stream(bus.clone())
            .publisher(bus.clone())
            .dedupe_store(dedupe.clone())
            .reveal_rng(config.reveal_rng)
            .presence_ttl_seconds(config.presence_ttl_seconds)
            .nudge_visible_ms(config.nudge_visible_ms)
            .reveal_policy(config.reveal_policy)
            .build()
            .expect("harness wiring is complete");

        Self {
            ctx,
            rooms,
            members,
            memories,
            presence,
            nudges,
            bus,
            dedupe,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
