//! Service context - dependency container for services
//!
//! Holds the repository ports, the change bus ports, the dedupe store, and
//! the handful of runtime policies services need.

use std::sync::Arc;

use tandem_cache::{
    RedisDedupeStore, RedisPool, RoomPublisher, RoomSubscriber, SubscriberConfig,
};
use tandem_common::{AppConfig, RevealPoolPolicy};
use tandem_core::traits::{
    ChangePublisher, ChangeStream, DedupeStore, MemberRepository, MemoryRepository,
    NudgeRepository, PresenceRepository, RoomRepository,
};
use tandem_db::{
    create_pool, run_migrations, PgMemberRepository, PgMemoryRepository, PgNudgeRepository,
    PgPresenceRepository, PgRoomRepository,
};

use crate::live::{RevealRng, ThreadRngDraw};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repository ports (Postgres in production, fakes in tests)
/// - The change event bus (subscribe and publish sides)
/// - The daily dedupe marker store
/// - Runtime policies: presence TTL, nudge timer, reveal pool policy
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    room_repo: Arc<dyn RoomRepository>,
    member_repo: Arc<dyn MemberRepository>,
    memory_repo: Arc<dyn MemoryRepository>,
    presence_repo: Arc<dyn PresenceRepository>,
    nudge_repo: Arc<dyn NudgeRepository>,

    // Change bus
    change_stream: Arc<dyn ChangeStream>,
    publisher: Arc<dyn ChangePublisher>,

    // Daily markers
    dedupe_store: Arc<dyn DedupeStore>,

    // Randomness for the reveal draw
    reveal_rng: Arc<dyn RevealRng>,

    // Policies
    presence_ttl_seconds: u64,
    nudge_visible_ms: u64,
    reveal_policy: RevealPoolPolicy,
}

impl ServiceContext {
    /// Wire a production context from configuration: Postgres pool plus
    /// migrations, Redis pool, pub/sub transport, marker store.
    pub async fn connect(config: &AppConfig) -> ServiceResult<Self> {
        let pool = create_pool(&config.database)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to connect to Postgres: {e}")))?;
        run_migrations(&pool)
            .await
            .map_err(|e| ServiceError::internal(format!("Failed to run migrations: {e}")))?;

        let redis_pool = RedisPool::from_config(&config.redis)
            .map_err(|e| ServiceError::internal(format!("Failed to create Redis pool: {e}")))?;

        let subscriber = RoomSubscriber::new(SubscriberConfig {
            redis_url: config.redis.url.clone(),
            ..SubscriberConfig::default()
        });

        ServiceContextBuilder::new()
            .room_repo(Arc::new(PgRoomRepository::new(pool.clone())))
            .member_repo(Arc::new(PgMemberRepository::new(pool.clone())))
            .memory_repo(Arc::new(PgMemoryRepository::new(pool.clone())))
            .presence_repo(Arc::new(PgPresenceRepository::new(pool.clone())))
            .nudge_repo(Arc::new(PgNudgeRepository::new(pool)))
            .change_stream(Arc::new(subscriber))
            .publisher(Arc::new(RoomPublisher::new(redis_pool.clone())))
            .dedupe_store(Arc::new(RedisDedupeStore::new(redis_pool)))
            .presence_ttl_seconds(config.presence.ttl_seconds)
            .nudge_visible_ms(config.nudge.visible_ms)
            .reveal_policy(config.reveal.policy)
            .build()
    }

    // === Repositories ===

    /// Get the room repository
    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the memory repository
    pub fn memory_repo(&self) -> &dyn MemoryRepository {
        self.memory_repo.as_ref()
    }

    /// Get the presence repository
    pub fn presence_repo(&self) -> &dyn PresenceRepository {
        self.presence_repo.as_ref()
    }

    /// Get the nudge repository
    pub fn nudge_repo(&self) -> &dyn NudgeRepository {
        self.nudge_repo.as_ref()
    }

    // === Change bus ===

    /// Get the change stream (subscribe side)
    pub fn change_stream(&self) -> &dyn ChangeStream {
        self.change_stream.as_ref()
    }

    /// Get the change publisher (publish side)
    pub fn publisher(&self) -> &dyn ChangePublisher {
        self.publisher.as_ref()
    }

    // === Daily markers ===

    /// Get the dedupe marker store
    pub fn dedupe_store(&self) -> &dyn DedupeStore {
        self.dedupe_store.as_ref()
    }

    // === Randomness ===

    /// Get the reveal draw RNG
    pub fn reveal_rng(&self) -> &dyn RevealRng {
        self.reveal_rng.as_ref()
    }

    // === Policies ===

    /// Presence records older than this count as offline
    pub fn presence_ttl_seconds(&self) -> u64 {
        self.presence_ttl_seconds
    }

    /// How long a delivered nudge stays visible
    pub fn nudge_visible_ms(&self) -> u64 {
        self.nudge_visible_ms
    }

    /// Which memories form the daily reveal candidate pool
    pub fn reveal_policy(&self) -> RevealPoolPolicy {
        self.reveal_policy
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("change_bus", &"...")
            .field("presence_ttl_seconds", &self.presence_ttl_seconds)
            .field("nudge_visible_ms", &self.nudge_visible_ms)
            .field("reveal_policy", &self.reveal_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    room_repo: Option<Arc<dyn RoomRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    memory_repo: Option<Arc<dyn MemoryRepository>>,
    presence_repo: Option<Arc<dyn PresenceRepository>>,
    nudge_repo: Option<Arc<dyn NudgeRepository>>,
    change_stream: Option<Arc<dyn ChangeStream>>,
    publisher: Option<Arc<dyn ChangePublisher>>,
    dedupe_store: Option<Arc<dyn DedupeStore>>,
    reveal_rng: Arc<dyn RevealRng>,
    presence_ttl_seconds: u64,
    nudge_visible_ms: u64,
    reveal_policy: RevealPoolPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            room_repo: None,
            member_repo: None,
            memory_repo: None,
            presence_repo: None,
            nudge_repo: None,
            change_stream: None,
            publisher: None,
            dedupe_store: None,
            reveal_rng: Arc::new(ThreadRngDraw),
            presence_ttl_seconds: 300,
            nudge_visible_ms: 3000,
            reveal_policy: RevealPoolPolicy::default(),
        }
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn memory_repo(mut self, repo: Arc<dyn MemoryRepository>) -> Self {
        self.memory_repo = Some(repo);
        self
    }

    pub fn presence_repo(mut self, repo: Arc<dyn PresenceRepository>) -> Self {
        self.presence_repo = Some(repo);
        self
    }

    pub fn nudge_repo(mut self, repo: Arc<dyn NudgeRepository>) -> Self {
        self.nudge_repo = Some(repo);
        self
    }

    pub fn change_stream(mut self, stream: Arc<dyn ChangeStream>) -> Self {
        self.change_stream = Some(stream);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn ChangePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn dedupe_store(mut self, store: Arc<dyn DedupeStore>) -> Self {
        self.dedupe_store = Some(store);
        self
    }

    pub fn reveal_rng(mut self, rng: Arc<dyn RevealRng>) -> Self {
        self.reveal_rng = rng;
        self
    }

    pub fn presence_ttl_seconds(mut self, seconds: u64) -> Self {
        self.presence_ttl_seconds = seconds;
        self
    }

    pub fn nudge_visible_ms(mut self, ms: u64) -> Self {
        self.nudge_visible_ms = ms;
        self
    }

    pub fn reveal_policy(mut self, policy: RevealPoolPolicy) -> Self {
        self.reveal_policy = policy;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            room_repo: self
                .room_repo
                .ok_or_else(|| ServiceError::validation("room_repo is required"))?,
            member_repo: self
                .member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            memory_repo: self
                .memory_repo
                .ok_or_else(|| ServiceError::validation("memory_repo is required"))?,
            presence_repo: self
                .presence_repo
                .ok_or_else(|| ServiceError::validation("presence_repo is required"))?,
            nudge_repo: self
                .nudge_repo
                .ok_or_else(|| ServiceError::validation("nudge_repo is required"))?,
            change_stream: self
                .change_stream
                .ok_or_else(|| ServiceError::validation("change_stream is required"))?,
            publisher: self
                .publisher
                .ok_or_else(|| ServiceError::validation("publisher is required"))?,
            dedupe_store: self
                .dedupe_store
                .ok_or_else(|| ServiceError::validation("dedupe_store is required"))?,
            reveal_rng: self.reveal_rng,
            presence_ttl_seconds: self.presence_ttl_seconds,
            nudge_visible_ms: self.nudge_visible_ms,
            reveal_policy: self.reveal_policy,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
