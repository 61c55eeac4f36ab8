//! Entity to model mappers
//!
//! Conversions between domain entities (tandem-core) and database models.
//! Rows whose columns cannot map back to a valid entity (corrupt join code,
//! unknown emotion) convert via `TryFrom` and surface an error.

mod member;
mod memory;
mod nudge;
mod presence;
mod room;
