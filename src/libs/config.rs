//! Configuration for the journaling store.
//!
//! The configuration is a small JSON file stored in the platform data
//! directory. It currently controls where the store file lives; callers that
//! want a throwaway or test database pass an explicit path to
//! [`crate::db::db::Db::open`] instead.
//!
//! The `MOODLOG_DATA_DIR` environment variable overrides the configured data
//! directory without touching the file, which keeps scripted and test
//! environments self-contained.

use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;

/// Configuration file name inside the platform data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MOODLOG_DATA_DIR";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Directory holding the store file. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration, falling back to defaults when the file is
    /// absent. The environment override wins over the file.
    pub fn read() -> Result<Self> {
        let mut config = match DataStorage::new().get_path(CONFIG_FILE_NAME) {
            Ok(path) if path.exists() => {
                let contents = fs::read_to_string(&path)?;
                serde_json::from_str(&contents)?
            }
            _ => Config::default(),
        };

        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    /// Persists the configuration to the platform data directory.
    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Resolves the full path for a file in the configured data directory,
    /// creating the directory if needed.
    pub fn resolve_path(&self, file_name: &str) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => {
                if !dir.exists() {
                    fs::create_dir_all(dir)?;
                }
                Ok(dir.join(file_name))
            }
            None => Ok(DataStorage::new().get_path(file_name)?),
        }
    }
}
