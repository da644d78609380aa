//! Data models for per-user study progress

use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::QuestionType;

/// One graded answer, appended to the subject's log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredRecord {
    pub question_id: u64,
    pub is_correct: bool,
    pub topic: String,
}

/// Summary of a completed pass through a quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub date: NaiveDate,
    pub questions_answered: usize,
    pub correct_answers: usize,
    /// Percentage, 0-100
    pub accuracy: u32,
}

/// Flashcard self-assessment tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardMark {
    Known,
    Review,
}

/// Quiz position, filters and answer log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    #[serde(default)]
    pub current_index: usize,
    /// `None` means all types
    #[serde(default)]
    pub type_filter: Option<QuestionType>,
    /// `None` means all topics
    #[serde(default)]
    pub topic_filter: Option<String>,
    /// Offset into the current subject's log where the current run starts
    #[serde(default)]
    pub run_start: usize,
    /// Set once the current run has been summarized
    #[serde(default)]
    pub finished: bool,
    /// Cumulative answer log per subject
    #[serde(default)]
    pub answered: IndexMap<String, Vec<AnsweredRecord>>,
}

/// Flashcard position, filter and known/review tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardProgress {
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub topic_filter: Option<String>,
    #[serde(default)]
    pub known: IndexMap<String, BTreeSet<u64>>,
    #[serde(default)]
    pub review: IndexMap<String, BTreeSet<u64>>,
}

/// Everything the learner has done, persisted as one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub current_subject: Option<String>,
    #[serde(default)]
    pub quiz: QuizProgress,
    #[serde(default)]
    pub flashcards: FlashcardProgress,
    /// Completed session summaries per subject, oldest first
    #[serde(default)]
    pub history: IndexMap<String, Vec<SessionSummary>>,
}
