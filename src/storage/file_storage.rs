use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::session::SessionState;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Session state document
pub const STATE_FILE: &str = "state.json";
/// Catalog document
pub const CATALOG_FILE: &str = "catalog.json";

/// Whole-document JSON persistence for the catalog and session state
pub struct JsonStore {
    base_path: PathBuf,
    pretty: bool,
}

impl JsonStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            pretty: true,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("exam-prep"))
            .ok_or(StorageError::DataDirNotFound)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    fn state_path(&self) -> PathBuf {
        self.base_path.join(STATE_FILE)
    }

    fn catalog_path(&self) -> PathBuf {
        self.base_path.join(CATALOG_FILE)
    }

    /// Replace both stored documents
    pub fn save(&self, state: &SessionState, catalog: &Catalog) -> Result<()> {
        self.init()?;
        self.write_document(&self.state_path(), state)?;
        self.write_document(&self.catalog_path(), catalog)?;
        log::debug!("Saved snapshot to {:?}", self.base_path);
        Ok(())
    }

    /// Load both documents.
    ///
    /// A missing state yields the default state. The catalog is `None` when
    /// nothing readable is stored. An unreadable document is moved aside to
    /// `<name>.corrupt` so the next save cannot overwrite it.
    pub fn load(&self) -> (SessionState, Option<Catalog>) {
        let state = self.read_or_set_aside(&self.state_path()).unwrap_or_default();
        let catalog = self.read_or_set_aside(&self.catalog_path());
        (state, catalog)
    }

    fn read_or_set_aside<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        match read_document(path) {
            Ok(value) => value,
            Err(e) => {
                let aside = corrupt_path(path);
                match fs::rename(path, &aside) {
                    Ok(()) => log::warn!("Ignoring unreadable document {:?} (moved to {:?}): {}", path, aside, e),
                    Err(rename_err) => log::warn!(
                        "Ignoring unreadable document {:?}: {} (could not move it aside: {})",
                        path,
                        e,
                        rename_err
                    ),
                }
                None
            }
        }
    }

    /// Write to a temporary sibling, then rename over the target
    fn write_document<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let content = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

/// Where an unreadable document is kept, e.g. `catalog.json.corrupt`
fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

/// Read a JSON document, `None` if the file does not exist
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)?;
    Ok(Some(value))
}
