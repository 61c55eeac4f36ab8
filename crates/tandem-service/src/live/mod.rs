//! Live session machinery - the change-feed consumer, state slices, and the
//! daily reveal flow

mod reveal;
mod room_session;
mod stale_cell;

pub use reveal::{DailyRevealFlow, RevealCheck, RevealRng, ThreadRngDraw};
pub use room_session::RoomSession;
pub use stale_cell::StaleCell;
