mod file_storage;
pub mod seed;
pub mod transfer;

pub use file_storage::{read_document, JsonStore, StorageError, CATALOG_FILE, STATE_FILE};
pub use seed::{load_seed, SEED_FILE};
pub use transfer::{export_file_name, export_to_dir, import_merge, parse_import, read_import_file, ImportReport};
