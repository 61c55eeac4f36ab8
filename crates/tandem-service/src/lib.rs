//! # tandem-service
//!
//! Application layer: the services behind room pairing, shared memories,
//! presence, and nudges, plus the live room session and the daily reveal
//! flow.

pub mod live;
pub mod services;

pub use live::{DailyRevealFlow, RevealCheck, RevealRng, RoomSession, StaleCell, ThreadRngDraw};
pub use services::{
    MemoryService, NudgeService, PresenceService, RoomService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
