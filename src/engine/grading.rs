//! Answer grading per question kind

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Question, QuestionBody, Solution};

/// A learner's response to a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Answer {
    /// Index of the picked option
    Choice(usize),
    /// Free-text response
    Text(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GradingError {
    #[error("This question expects {expected}")]
    WrongAnswerKind { expected: &'static str },

    #[error("Option {index} does not exist ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },

    #[error("Please enter an answer")]
    EmptyAnswer,
}

/// Outcome of grading one answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub is_correct: bool,
    pub explanation: String,
    /// Text of the expected answer, for feedback
    pub expected: String,
    /// Revealed solution of a practice question
    pub solution: Option<Solution>,
}

/// Grade an answer against a question.
///
/// Choice questions need the exact option index. Short answers match when the
/// trimmed, lowercased response contains any accepted keyword. Practice
/// questions only reveal their solution and always count as correct.
pub fn grade(question: &Question, answer: &Answer) -> Result<Grade, GradingError> {
    match (&question.body, answer) {
        (
            QuestionBody::MultipleChoice { options, correct_index }
            | QuestionBody::TrueFalse { options, correct_index },
            Answer::Choice(index),
        ) => {
            if *index >= options.len() {
                return Err(GradingError::OptionOutOfRange {
                    index: *index,
                    count: options.len(),
                });
            }
            Ok(Grade {
                is_correct: index == correct_index,
                explanation: question.explanation.clone(),
                expected: options[*correct_index].clone(),
                solution: None,
            })
        }
        (QuestionBody::MultipleChoice { .. } | QuestionBody::TrueFalse { .. }, Answer::Text(_)) => {
            Err(GradingError::WrongAnswerKind {
                expected: "an option number",
            })
        }
        (QuestionBody::ShortAnswer { keywords }, Answer::Text(text)) => {
            let response = text.trim().to_lowercase();
            if response.is_empty() {
                return Err(GradingError::EmptyAnswer);
            }
            let is_correct = keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .any(|k| response.contains(&k));
            Ok(Grade {
                is_correct,
                explanation: question.explanation.clone(),
                expected: keywords.join(", "),
                solution: None,
            })
        }
        (QuestionBody::Practice { solution }, Answer::Text(text)) => {
            if text.trim().is_empty() {
                return Err(GradingError::EmptyAnswer);
            }
            Ok(Grade {
                is_correct: true,
                explanation: question.explanation.clone(),
                expected: solution.as_str().to_string(),
                solution: Some(solution.clone()),
            })
        }
        (QuestionBody::ShortAnswer { .. } | QuestionBody::Practice { .. }, Answer::Choice(_)) => {
            Err(GradingError::WrongAnswerKind { expected: "a text answer" })
        }
    }
}
