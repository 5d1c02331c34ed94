use std::sync::Arc;

use tt_domain::config::Config;
use tt_ops::RestaurantStore;
use tt_providers::ModelTransport;
use tt_registry::Registry;
use tt_sessions::SessionStore;

use crate::runtime::session_lock::SessionLockMap;

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services** — config, the model transport
/// - **Conversation** — operation registry, session store, per-session locks
/// - **Data** — the restaurant store the operations act on
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub transport: Arc<dyn ModelTransport>,

    // ── Conversation ──────────────────────────────────────────────────
    /// Built once at startup, read-only afterward.
    pub registry: Arc<Registry>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_locks: Arc<SessionLockMap>,

    // ── Data ──────────────────────────────────────────────────────────
    pub restaurants: Arc<RestaurantStore>,
}
