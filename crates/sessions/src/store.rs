//! Session persistence.
//!
//! The file store keeps every session in `sessions.json` under the
//! configured state dir, with an in-memory map in front. Saves write
//! through; `flush` forces a write (shutdown path).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use tt_domain::error::{Error, Result};

use crate::session::Session;

/// Storage-facing view of sessions. The orchestrator only ever loads,
/// saves, creates, or removes whole sessions.
pub trait SessionStore: Send + Sync {
    fn load(&self, session_id: &str) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn create_idle(&self, session_id: &str, owner_id: i64, restaurant_id: i64) -> Result<Session>;
    fn remove(&self, session_id: &str) -> Result<()>;
    /// Persist everything (no-op for stores without a backing file).
    fn flush(&self) -> Result<()>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// File-backed store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct FileSessionStore {
    sessions_path: PathBuf,
    sessions: RwLock<HashMap<String, Session>>,
}

impl FileSessionStore {
    /// Load or create the store at `state_dir/sessions.json`.
    pub fn new(state_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_dir).map_err(Error::Io)?;

        let sessions_path = state_dir.join("sessions.json");
        let sessions: HashMap<String, Session> = if sessions_path.exists() {
            let raw = std::fs::read_to_string(&sessions_path).map_err(Error::Io)?;
            serde_json::from_str(&raw).unwrap_or_default()
        } else {
            HashMap::new()
        };

        tracing::info!(
            sessions = sessions.len(),
            path = %sessions_path.display(),
            "session store loaded"
        );

        Ok(Self {
            sessions_path,
            sessions: RwLock::new(sessions),
        })
    }

    fn write_file(&self, sessions: &HashMap<String, Session>) -> Result<()> {
        let json = serde_json::to_string_pretty(sessions)
            .map_err(|e| Error::Other(format!("serializing sessions: {e}")))?;
        std::fs::write(&self.sessions_path, json).map_err(Error::Io)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut touched = session.clone();
        touched.updated_at = chrono::Utc::now();

        let mut sessions = self.sessions.write();
        sessions.insert(touched.session_id.clone(), touched);
        self.write_file(&sessions)
    }

    fn create_idle(&self, session_id: &str, owner_id: i64, restaurant_id: i64) -> Result<Session> {
        let session = Session::new_idle(session_id, owner_id, restaurant_id);
        self.sessions
            .write()
            .insert(session_id.to_owned(), session.clone());
        tracing::debug!(session_id = %session_id, "session created");
        Ok(session)
    }

    fn remove(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write();
        sessions.remove(session_id);
        self.write_file(&sessions)
    }

    fn flush(&self) -> Result<()> {
        let sessions = self.sessions.read();
        self.write_file(&sessions)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// In-memory store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Map-only store for tests and embedded use.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, session_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().get(session_id).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    fn create_idle(&self, session_id: &str, owner_id: i64, restaurant_id: i64) -> Result<Session> {
        let session = Session::new_idle(session_id, owner_id, restaurant_id);
        self.sessions
            .write()
            .insert(session_id.to_owned(), session.clone());
        Ok(session)
    }

    fn remove(&self, session_id: &str) -> Result<()> {
        self.sessions.write().remove(session_id);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
