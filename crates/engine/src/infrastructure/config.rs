//! Engine configuration from environment variables.

use std::fmt;

/// Which placement store backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub store: StoreKind,
    pub db_path: String,
    pub server_host: String,
    pub server_port: u16,
    /// Comma-separated origins, or `*`. No CORS layer when unset.
    pub cors_allowed_origins: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Sqlite,
            db_path: "fitplan.db".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            cors_allowed_origins: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back
    /// to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let store = match lookup("FITPLAN_STORE").map(|s| s.trim().to_ascii_lowercase()) {
            None => defaults.store,
            Some(value) => match value.as_str() {
                "sqlite" => StoreKind::Sqlite,
                "memory" => StoreKind::Memory,
                _ => {
                    tracing::warn!(value = %value, "Unknown FITPLAN_STORE, using sqlite");
                    defaults.store
                }
            },
        };

        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            None => defaults.server_port,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid server port, using 3000");
                defaults.server_port
            }),
        };

        Self {
            store,
            db_path: non_empty(lookup("FITPLAN_DB_PATH")).unwrap_or(defaults.db_path),
            server_host: non_empty(lookup("SERVER_HOST")).unwrap_or(defaults.server_host),
            server_port,
            cors_allowed_origins: non_empty(lookup("CORS_ALLOWED_ORIGINS")),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> EngineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]), EngineConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("FITPLAN_STORE", "Memory"),
            ("FITPLAN_DB_PATH", "/tmp/plans.db"),
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", "*"),
        ]);
        assert_eq!(cfg.store, StoreKind::Memory);
        assert_eq!(cfg.db_path, "/tmp/plans.db");
        assert_eq!(cfg.server_host, "127.0.0.1");
        assert_eq!(cfg.server_port, 8080);
        assert_eq!(cfg.cors_allowed_origins.as_deref(), Some("*"));
    }

    #[test]
    fn port_falls_back_to_port_variable() {
        assert_eq!(config(&[("PORT", "9000")]).server_port, 9000);
        assert_eq!(
            config(&[("SERVER_PORT", "9001"), ("PORT", "9000")]).server_port,
            9001
        );
    }

    #[test]
    fn bad_values_use_defaults() {
        let cfg = config(&[
            ("FITPLAN_STORE", "postgres"),
            ("SERVER_PORT", "eighty"),
            ("FITPLAN_DB_PATH", "   "),
        ]);
        assert_eq!(cfg, EngineConfig::default());
    }
}
