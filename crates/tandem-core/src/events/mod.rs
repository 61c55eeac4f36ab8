//! Change events - mutation notifications flowing through the room bus

mod change_event;

pub use change_event::{ChangeEvent, ChangeKind, ChangeTopic};
