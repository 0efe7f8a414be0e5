use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Environment variable selecting the Postgres database; unset means in-memory SQLite
pub const DATABASE_URI_ENV: &str = "SQLALCHEMY_DATABASE_URI";

/// In-memory fallback store
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Postgres URI; overridden by `SQLALCHEMY_DATABASE_URI`
    #[serde(default)]
    pub database_url: Option<String>,

    /// Directory holding the page templates
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// `days` value shown on the index page before any filter is posted
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// CSV used to fill `stocked_lakes_table` when the store is empty
    #[serde(default)]
    pub seed_stocked_csv: Option<String>,

    /// CSV used to fill `derby_lakes_table` when the store is empty
    #[serde(default)]
    pub seed_derby_csv: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_template_dir() -> String {
    "resources".to_string()
}

fn default_days() -> u32 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            database_url: None,
            template_dir: default_template_dir(),
            default_days: default_days(),
            seed_stocked_csv: None,
            seed_derby_csv: None,
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path, e))?;
        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database URL to connect to: env var first, then config, then in-memory SQLite.
    pub fn database_url(&self) -> String {
        resolve_database_url(
            std::env::var(DATABASE_URI_ENV).ok(),
            self.database_url.clone(),
        )
    }
}

fn resolve_database_url(env_url: Option<String>, config_url: Option<String>) -> String {
    env_url
        .filter(|u| !u.trim().is_empty())
        .or(config_url.filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| SQLITE_MEMORY_URL.to_string())
}

pub static CONFIG: OnceLock<ServerConfig> = OnceLock::new();

/// Load `.env`, then `config.toml` if present (defaults otherwise).
pub fn read_config() -> anyhow::Result<&'static ServerConfig> {
    let _ = dotenvy::dotenv();

    let path = "config.toml";
    let config = if Path::new(path).exists() {
        ServerConfig::from_file(path)?
    } else {
        ServerConfig::default()
    };

    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 8080
            seed_derby_csv = "data/derby.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_days, 30);
        assert_eq!(config.template_dir, "resources");
        assert_eq!(config.seed_derby_csv.as_deref(), Some("data/derby.csv"));
        assert!(config.seed_stocked_csv.is_none());
        assert_eq!(config.server_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_resolve_database_url() {
        assert_eq!(resolve_database_url(None, None), SQLITE_MEMORY_URL);
        assert_eq!(
            resolve_database_url(None, Some("postgres://cfg/db".to_string())),
            "postgres://cfg/db"
        );
        assert_eq!(
            resolve_database_url(
                Some("postgres://env/db".to_string()),
                Some("postgres://cfg/db".to_string())
            ),
            "postgres://env/db"
        );
        assert_eq!(resolve_database_url(Some(" ".to_string()), None), SQLITE_MEMORY_URL);
    }
}
