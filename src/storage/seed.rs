//! Startup data document
//!
//! The seed file has the bare catalog shape `{ subjectId: Subject }` and is
//! read once when a workspace opens.

use std::path::Path;

use super::file_storage::{read_document, Result};
use crate::catalog::Catalog;

/// Default seed file name inside the data directory
pub const SEED_FILE: &str = "data.json";

/// Read the seed catalog, `None` when there is no seed file
pub fn load_seed(path: &Path) -> Result<Option<Catalog>> {
    let seed: Option<Catalog> = read_document(path)?;
    if let Some(catalog) = &seed {
        log::info!("Loaded {} subjects from seed {:?}", catalog.len(), path);
    }
    Ok(seed)
}
