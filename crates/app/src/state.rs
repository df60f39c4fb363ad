use std::{fs, path::PathBuf};

use common::kv::{FileKeyValueStore, FileKeyValueStoreError};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "par";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STORE_DIR_NAME: &str = "store";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Remembered bucket (id or name) used when a command names none
    #[serde(default)]
    pub active_bucket: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            active_bucket: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the par directory (~/.par)
    pub par_dir: PathBuf,
    /// Path to the key-value store directory
    pub store_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the par directory path (custom or default ~/.par)
    pub fn par_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new par state directory
    pub fn init(custom_path: Option<PathBuf>, config: Option<AppConfig>) -> Result<Self, StateError> {
        let par_dir = Self::par_dir(custom_path)?;

        if par_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&par_dir)?;

        let store_path = par_dir.join(STORE_DIR_NAME);
        fs::create_dir_all(&store_path)?;

        let config = config.unwrap_or_default();
        let config_path = par_dir.join(CONFIG_FILE_NAME);
        let state = Self {
            par_dir,
            store_path,
            config_path,
            config,
        };
        state.save_config()?;

        Ok(state)
    }

    /// Load existing state from the par directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let par_dir = Self::par_dir(custom_path)?;

        if !par_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let store_path = par_dir.join(STORE_DIR_NAME);
        let config_path = par_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            par_dir,
            store_path,
            config_path,
            config,
        })
    }

    /// Write the current config back to disk
    pub fn save_config(&self) -> Result<(), StateError> {
        let config_toml = toml::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, config_toml)?;
        Ok(())
    }

    /// Open the durable store backing remembered buckets
    pub fn store(&self) -> Result<FileKeyValueStore, StateError> {
        Ok(FileKeyValueStore::open(&self.store_path)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("par directory not initialized. Run 'par init' first")]
    NotInitialized,

    #[error("par directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] FileKeyValueStoreError),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("par");

        let config = AppConfig {
            log_level: "debug".to_string(),
            active_bucket: Some("photos".to_string()),
        };
        let state = AppState::init(Some(dir.clone()), Some(config)).unwrap();
        assert!(state.store_path.exists());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config.log_level, "debug");
        assert_eq!(loaded.config.active_bucket.as_deref(), Some("photos"));

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppState::load(Some(temp_dir.path().join("missing")));
        assert!(matches!(result, Err(StateError::NotInitialized)));
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.active_bucket.is_none());
    }
}
