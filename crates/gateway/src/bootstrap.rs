//! AppState construction extracted from `main.rs`.
//!
//! `serve`, `chat`, and `seed` all boot through here so the full engine
//! comes up identically with or without an HTTP listener.

use std::sync::Arc;

use anyhow::Context;

use tt_domain::config::{Config, ConfigSeverity};
use tt_ops::RestaurantStore;
use tt_providers::{ModelTransport, OllamaTransport};
use tt_registry::Registry;
use tt_sessions::{FileSessionStore, SessionStore};

use crate::runtime::SessionLockMap;
use crate::state::AppState;

/// Validate config, initialize every subsystem, and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Session store ────────────────────────────────────────────────
    let sessions: Arc<dyn SessionStore> = Arc::new(
        FileSessionStore::new(&config.storage.state_dir).context("initializing session store")?,
    );

    // ── Restaurant store ─────────────────────────────────────────────
    let restaurants = Arc::new(
        RestaurantStore::new(&config.storage.state_dir)
            .context("initializing restaurant store")?,
    );
    if restaurants.is_empty() {
        tt_ops::seed::seed(&restaurants).context("seeding demo restaurant")?;
    }

    // ── Operation registry ───────────────────────────────────────────
    let mut registry = Registry::new();
    tt_ops::register_all(&mut registry, &restaurants).context("registering operations")?;
    let registry = Arc::new(registry);
    tracing::info!(operations = registry.len(), "operation registry ready");

    // ── Model transport ──────────────────────────────────────────────
    let transport: Arc<dyn ModelTransport> = Arc::new(
        OllamaTransport::from_config(&config.model).context("initializing model transport")?,
    );
    tracing::info!(
        base_url = %config.model.base_url,
        model = %config.model.model,
        max_attempts = config.model.max_attempts,
        "model transport ready"
    );

    // ── Session locks (per-session turn serialization) ───────────────
    let session_locks = Arc::new(SessionLockMap::new());

    Ok(AppState {
        config,
        transport,
        registry,
        sessions,
        session_locks,
        restaurants,
    })
}

/// Spawn the long-running background tasks.
///
/// Call this **after** [`build_app_state`] when running the HTTP server;
/// the REPL and one-shot commands skip it.
pub fn spawn_background_tasks(state: &AppState) {
    // ── Periodic session lock pruning ────────────────────────────────
    {
        let session_locks = state.session_locks.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                session_locks.prune_idle();
            }
        });
    }
    tracing::info!("background tasks spawned");
}
