//! Exam catalog: subjects, topics, questions and flashcards
//!
//! This module provides:
//! - The data model and its JSON document format
//! - Slug and item id generation
//! - Validated authoring operations (create, edit, delete)

pub mod ids;
pub mod models;
pub mod store;

pub use ids::{next_item_id, slugify};
pub use models::*;
pub use store::{parse_keywords, CatalogError, NewFlashcard, NewQuestion};
