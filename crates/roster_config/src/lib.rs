//! Configuration for the Roster services.
//!
//! Values are layered: built-in defaults, then `config/default.*`, then
//! `config/{RUN_ENV}.*`, then `ROSTER__SECTION__KEY` environment variables.
//! Any string left as `"secret_from_env"` is replaced by the environment
//! variable named after its path, so `database.url` reads `DATABASE_URL`.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// Marker value that defers a setting to the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the application configuration from the default locations.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("ROSTER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    load_config_from(&config_dir, &run_env)
}

/// Loads the configuration from an explicit directory and run environment.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, ConfigError> {
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);
    debug!(
        default_path = %default_path.display(),
        env_path = %env_path.display(),
        "loading configuration"
    );

    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("server.host", defaults.server.host)?
        .set_default("server.port", i64::from(defaults.server.port))?
        .set_default("database.url", defaults.database.url)?
        .set_default("records.idempotent_delete_all", false)?
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix("ROSTER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_MARKER);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The path defaults to `.env` and can be overridden with `DOTENV_OVERRIDE`.
/// Only the first call has an effect; the chosen path is returned.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("roster-config-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = env::temp_dir().join("roster-config-does-not-exist");
        let config = load_config_from(&dir, "debug").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert!(config.database.is_memory());
        assert!(!config.records.idempotent_delete_all);
    }

    #[test]
    fn test_run_env_file_overrides_default_file() {
        let dir = scratch_dir("layers");
        fs::write(
            dir.join("default.toml"),
            "[server]\nport = 7000\n\n[database]\nurl = \"sqlite://data/roster.db\"\n",
        )
        .unwrap();
        fs::write(
            dir.join("staging.toml"),
            "[server]\nport = 7100\n\n[records]\nidempotent_delete_all = true\n",
        )
        .unwrap();

        let config = load_config_from(&dir, "staging").unwrap();

        assert_eq!(config.server.port, 7100);
        assert_eq!(config.database.url, "sqlite://data/roster.db");
        assert!(config.records.idempotent_delete_all);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_secret_marker_reads_environment() {
        env::set_var("ROSTER_MARKER_TEST_TOKEN", "from-env");
        let mut value = serde_json::json!({
            "roster_marker_test": { "token": SECRET_MARKER },
            "untouched": "plain"
        });

        inject_env_secrets(&mut value);

        assert_eq!(value["roster_marker_test"]["token"], "from-env");
        assert_eq!(value["untouched"], "plain");
    }

    #[test]
    fn test_database_url_marker_reads_database_url() {
        let dir = scratch_dir("database-url");
        fs::write(
            dir.join("default.toml"),
            "[database]\nurl = \"secret_from_env\"\n",
        )
        .unwrap();
        env::set_var("DATABASE_URL", "postgres://roster@localhost/roster");

        let config = load_config_from(&dir, "debug").unwrap();
        assert_eq!(config.database.url, "postgres://roster@localhost/roster");

        fs::write(
            dir.join("default.toml"),
            "[database]\nurl = \"sqlite://data/roster.db\"\n",
        )
        .unwrap();
        let config = load_config_from(&dir, "debug").unwrap();
        assert_eq!(config.database.url, "sqlite://data/roster.db");

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_secret_keeps_marker() {
        let mut value = serde_json::json!({ "roster_absent": { "secret": SECRET_MARKER } });

        inject_env_secrets(&mut value);

        assert_eq!(value["roster_absent"]["secret"], SECRET_MARKER);
    }
}
