//! Settings file (`config.toml` in the data directory)
//!
//! ```toml
//! # Store documents somewhere else than the data directory
//! data_dir = "/srv/exam-prep"
//! # Startup data document; relative paths are resolved against the data directory
//! seed_file = "data.json"
//! pretty_json = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::{JsonStore, StorageError, SEED_FILE};

/// Environment variable overriding the default data directory
pub const DATA_DIR_ENV: &str = "EXAM_PREP_DATA_DIR";

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the state and catalog documents live
    pub data_dir: Option<PathBuf>,
    /// Startup data document
    pub seed_file: Option<PathBuf>,
    /// Indent stored JSON
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_file: None,
            pretty_json: true,
        }
    }
}

impl Settings {
    /// Load `config.toml` from `dir`, defaults when absent
    pub fn load(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Base directory: explicit override, then environment, then platform default
    pub fn base_dir(explicit: Option<PathBuf>) -> Result<PathBuf, StorageError> {
        if let Some(dir) = explicit {
            return Ok(dir);
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        JsonStore::default_data_dir()
    }

    /// Directory the store writes to
    pub fn data_dir(&self, base_dir: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| base_dir.to_path_buf())
    }

    pub fn seed_path(&self, data_dir: &Path) -> PathBuf {
        match &self.seed_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join(SEED_FILE),
        }
    }
}
