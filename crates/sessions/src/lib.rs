//! Conversation session state for TableTalk.
//!
//! A [`Session`] tracks one chat's slot-filling progress: which operation
//! is being collected for, the arguments gathered so far, and the derived
//! missing-field list. The transition methods are pure, synchronous
//! read-merge-write logic; persistence lives behind [`SessionStore`].

pub mod session;
pub mod store;

pub use session::{HistoryEntry, Session, SessionStatus, HISTORY_LIMIT};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
