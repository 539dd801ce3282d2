// --- File: crates/roster_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://data/roster.db, or "memory" for the in-process store
    #[serde(default)]
    pub max_connections: Option<u32>,
}

impl DatabaseConfig {
    /// Whether the records live in the process instead of a database.
    pub fn is_memory(&self) -> bool {
        self.url == "memory"
    }
}

// --- Record service behaviour ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RecordsConfig {
    /// Answer `DELETE /{records}/all/delete` with 204 even when nothing was stored.
    #[serde(default)]
    pub idempotent_delete_all: bool,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "memory".to_string(),
                max_connections: None,
            },
            records: RecordsConfig::default(),
            log_level: None,
        }
    }
}
