//! # tandem-db
//!
//! Database layer implementing the `tandem-core` repository ports with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tandem_db::{create_pool, run_migrations, PgRoomRepository};
//! use tandem_core::traits::RoomRepository;
//!
//! async fn example(config: &tandem_common::DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let room_repo = PgRoomRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, MIGRATOR};
pub use repositories::{
    PgMemberRepository, PgMemoryRepository, PgNudgeRepository, PgPresenceRepository,
    PgRoomRepository,
};
