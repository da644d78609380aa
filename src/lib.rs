pub mod catalog;
pub mod config;
pub mod engine;
pub mod session;
pub mod storage;
pub mod workspace;

pub use config::Settings;
pub use workspace::{Workspace, WorkspaceError};
