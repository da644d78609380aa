//! Study session state: quiz position, answer log, flashcard tags, history

pub mod models;
pub mod state;

pub use models::*;
pub use state::{Advance, SessionError};
