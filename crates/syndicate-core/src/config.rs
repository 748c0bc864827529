//! Configuration loading and typed config structures for Syndicate.
//!
//! The canonical configuration lives in `syndicate-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror
//! the YAML structure, and provides a loader that reads the file and
//! applies environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use syndicate_store::{Backend, LocalStore, RemoteStore, StoreError};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `syndicate-config.yaml`. Every field has a
/// default, so an empty file (or no file) runs a local single-machine game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyndicateConfig {
    /// Which storage backend to use and how to reach it.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Gameplay knobs.
    #[serde(default)]
    pub game: GameConfig,
}

impl SyndicateConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for storage:
    /// - `SYNDICATE_BACKEND` overrides `storage.backend` (`local` or `remote`)
    /// - `REDIS_URL` overrides `storage.redis_url`
    /// - `SYNDICATE_DATA_PATH` overrides `storage.local_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults
    /// (still applying environment overrides).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be loaded.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            let mut config = Self::default();
            config.storage.apply_env_overrides();
            Ok(config)
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.storage.apply_env_overrides();
        Ok(config)
    }
}

/// Which storage backend the game runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single-machine store; only tabs on this machine see each other.
    #[default]
    Local,
    /// Shared Redis-compatible server.
    Remote,
}

impl BackendKind {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Backend selection.
    #[serde(default)]
    pub backend: BackendKind,

    /// Redis/`Dragonfly` URL for the remote backend.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// JSON file mirroring the local store. In-memory only when unset.
    #[serde(default)]
    pub local_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Override storage settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SYNDICATE_BACKEND") {
            match BackendKind::from_env_value(&val) {
                Some(kind) => self.backend = kind,
                None => tracing::warn!("Ignoring unknown SYNDICATE_BACKEND value: {val}"),
            }
        }
        if let Ok(val) = std::env::var("REDIS_URL") {
            self.redis_url = val;
        }
        if let Ok(val) = std::env::var("SYNDICATE_DATA_PATH") {
            self.local_path = Some(PathBuf::from(val));
        }
    }

    /// Open the configured backend.
    ///
    /// `local` is the store already opened with [`Self::open_local`]; in
    /// local mode companies share it with the credentials.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the remote server cannot be reached.
    pub async fn open_backend(&self, local: &LocalStore) -> Result<Backend, StoreError> {
        let backend = match self.backend {
            BackendKind::Local => Backend::Local(local.clone()),
            BackendKind::Remote => Backend::Remote(RemoteStore::connect(&self.redis_url).await?),
        };
        tracing::info!(backend = backend.kind(), "Storage backend ready");
        Ok(backend)
    }

    /// Open the local store (used for credentials in every mode).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the mirror file exists but is unreadable.
    pub async fn open_local(&self) -> Result<LocalStore, StoreError> {
        match &self.local_path {
            Some(path) => LocalStore::open(path).await,
            None => Ok(LocalStore::in_memory()),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            redis_url: default_redis_url(),
            local_path: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Gameplay configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Seed for mission and heist rolls. Random per session when unset.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

// =============================================================================
// Default value functions (required by serde)
// =============================================================================

fn default_redis_url() -> String {
    "redis://localhost:6379".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_runs_locally() {
        let config = SyndicateConfig::default();
        assert_eq!(config.storage.backend, BackendKind::Local);
        assert_eq!(config.storage.redis_url, "redis://localhost:6379");
        assert!(config.storage.local_path.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(config.game.rng_seed.is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
storage:
  backend: remote
  redis_url: "redis://cache:6380"
  local_path: "/tmp/syndicate.json"
logging:
  level: debug
  json: true
game:
  rng_seed: 99
"#;
        let config = SyndicateConfig::parse(yaml).unwrap();
        // Environment may override storage; the rest is file-driven.
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.game.rng_seed, Some(99));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SyndicateConfig::parse("game:\n  rng_seed: 7\n").unwrap();
        assert_eq!(config.game.rng_seed, Some(7));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SyndicateConfig::parse("").is_ok());
    }

    #[test]
    fn unknown_backend_is_a_yaml_error() {
        let result = SyndicateConfig::parse("storage:\n  backend: cloud\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn backend_env_values() {
        assert_eq!(BackendKind::from_env_value("Remote"), Some(BackendKind::Remote));
        assert_eq!(BackendKind::from_env_value(" local "), Some(BackendKind::Local));
        assert_eq!(BackendKind::from_env_value("firebase"), None);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("syndicate-config.yaml");
        if path.exists() {
            let config = SyndicateConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }

    #[tokio::test]
    async fn in_memory_local_backend_by_default() {
        let storage = StorageConfig {
            backend: BackendKind::Local,
            redis_url: default_redis_url(),
            local_path: None,
        };
        let local = storage.open_local().await.unwrap();
        let backend = storage.open_backend(&local).await.unwrap();
        assert_eq!(backend.kind(), "local");
    }
}
