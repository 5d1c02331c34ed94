pub mod config;
pub mod repl;

use clap::{Parser, Subcommand};

/// TableTalk — conversational settings management for restaurant owners.
#[derive(Debug, Parser)]
#[command(name = "tabletalk", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default when no subcommand is given).
    Serve,
    /// Interactive chat REPL against the local engine (no server).
    Chat {
        /// Session ID to continue (defaults to a fresh one).
        #[arg(long)]
        session: Option<String>,
        /// Restaurant the conversation manages.
        #[arg(long, default_value_t = 1)]
        restaurant: i64,
        /// Owner acting in the conversation.
        #[arg(long, default_value_t = 1)]
        owner: i64,
    },
    /// Write the demo restaurant into the data directory.
    Seed,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path named by `TT_CONFIG` (or
/// `config.toml` by default). Returns the parsed [`Config`] and the
/// path that was used.
///
/// Shared by every subcommand so the logic lives in one place.
pub fn load_config() -> anyhow::Result<(tt_domain::config::Config, String)> {
    let config_path = std::env::var("TT_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        tt_domain::config::Config::default()
    };

    Ok((config, config_path))
}
