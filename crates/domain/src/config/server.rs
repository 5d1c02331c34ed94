use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the HTTP API listens and which browsers may call it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. Localhost by default; set `0.0.0.0` to expose.
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_8000")]
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: d_host(),
            port: 8000,
            cors: CorsConfig::default(),
        }
    }
}

/// Browser origins the API will answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. A trailing `:*` matches any port on that host;
    /// a single `"*"` entry allows everything (flagged by validation).
    #[serde(default = "d_cors_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: d_cors_origins(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_host() -> String {
    "127.0.0.1".into()
}

fn d_8000() -> u16 {
    8000
}

fn d_cors_origins() -> Vec<String> {
    vec!["http://localhost:*".into(), "http://127.0.0.1:*".into()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_localhost() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.cors.allowed_origins.len(), 2);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: ServerConfig = toml::from_str("port = 9090").unwrap();
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn cors_origins_override_as_nested_table() {
        let cfg: ServerConfig = toml::from_str(
            r#"
            host = "0.0.0.0"

            [cors]
            allowed_origins = ["https://dashboard.example.com"]
            "#,
        )
        .unwrap();
        assert_eq!(
            cfg.cors.allowed_origins,
            vec!["https://dashboard.example.com"]
        );
        assert_eq!(cfg.port, 8000);
    }
}
