//! Deterministic prompt assembly.
//!
//! Everything the model sees in one turn is built here, as a pure
//! function of the operation catalog, the session, and the user's
//! message. No I/O, no clock, no randomness: the same inputs produce a
//! byte-identical prompt.

pub mod builder;

pub use builder::{build_messages, corrective_note_for};
