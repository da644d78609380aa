//! Filtering, grading and statistics over the catalog
//!
//! Everything here is a pure function of the catalog and the answer log;
//! nothing in this module mutates state.

pub mod filter;
pub mod grading;
pub mod stats;

pub use filter::{filter_flashcards, filter_questions, list_content, ContentItem, ContentKind};
pub use grading::{grade, Answer, Grade, GradingError};
pub use stats::{
    compute_accuracy, compute_topic_stats, percent, progress_percent, subject_stats, SubjectStats, TopicStats,
    TopicSummary,
};
