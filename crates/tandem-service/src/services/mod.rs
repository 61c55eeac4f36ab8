//! Service layer - business logic over the repository and bus ports

mod context;
mod error;
mod memory;
mod nudge;
mod presence;
mod room;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use memory::MemoryService;
pub use nudge::NudgeService;
pub use presence::PresenceService;
pub use room::RoomService;
