//! Data models for the exam catalog
//!
//! The in-memory shape uses an explicit tagged union for question bodies. The
//! JSON shape is the one the data files have always used: question type is
//! given by the bucket a question sits in, and the body is told apart by which
//! of `options` / `correctAnswer` / `solution` it carries.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a stored or imported document does not fit the model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("Invalid {kind} question {id}: {reason}")]
    InvalidQuestion {
        id: u64,
        kind: QuestionType,
        reason: String,
    },
}

/// Question type, which is also the name of the bucket holding the question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    #[serde(rename = "pratique", alias = "practice")]
    Practice,
}

impl QuestionType {
    /// Bucket order used whenever all types are listed together
    pub const ALL: [QuestionType; 4] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
        QuestionType::Practice,
    ];

    /// Key of the bucket in the `quizData` object
    pub fn key(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
            Self::ShortAnswer => "short-answer",
            Self::Practice => "pratique",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "multiple-choice" => Some(Self::MultipleChoice),
            "true-false" => Some(Self::TrueFalse),
            "short-answer" => Some(Self::ShortAnswer),
            "pratique" | "practice" => Some(Self::Practice),
            _ => None,
        }
    }

    /// Whether answers are given by picking an option
    pub fn is_choice(self) -> bool {
        matches!(self, Self::MultipleChoice | Self::TrueFalse)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
            Self::ShortAnswer => "short-answer",
            Self::Practice => "practice",
        };
        f.write_str(label)
    }
}

impl FromStr for QuestionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(&s.to_lowercase()).ok_or_else(|| ModelError::UnknownQuestionType(s.to_string()))
    }
}

/// Revealed answer of a practice question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    Text(String),
    Code(String),
}

const CODE_INDICATORS: [&str; 9] = ["{", "}", ";", "()", "[]", "function", "int ", "void ", "#include"];

impl Solution {
    /// Classify free-form solution text as code or prose
    pub fn from_text(text: &str) -> Self {
        let text = text.trim().to_string();
        if CODE_INDICATORS.iter().any(|marker| text.contains(marker)) {
            Self::Code(text)
        } else {
            Self::Text(text)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) | Self::Code(text) => text,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Self::Code(_))
    }
}

/// Kind-specific part of a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionBody {
    MultipleChoice { options: Vec<String>, correct_index: usize },
    TrueFalse { options: Vec<String>, correct_index: usize },
    ShortAnswer { keywords: Vec<String> },
    Practice { solution: Solution },
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionType {
        match self {
            Self::MultipleChoice { .. } => QuestionType::MultipleChoice,
            Self::TrueFalse { .. } => QuestionType::TrueFalse,
            Self::ShortAnswer { .. } => QuestionType::ShortAnswer,
            Self::Practice { .. } => QuestionType::Practice,
        }
    }

    /// Standard true/false pair
    pub fn true_false(correct: bool) -> Self {
        Self::TrueFalse {
            options: vec!["True".to_string(), "False".to_string()],
            correct_index: if correct { 0 } else { 1 },
        }
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::MultipleChoice { options, .. } | Self::TrueFalse { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Structural invariants every stored question must satisfy
    pub fn check_shape(&self) -> Result<(), String> {
        match self {
            Self::MultipleChoice { options, correct_index } | Self::TrueFalse { options, correct_index } => {
                if options.len() < 2 {
                    return Err("a question must have at least 2 options".to_string());
                }
                if *correct_index >= options.len() {
                    return Err(format!(
                        "correct answer index {} is out of range for {} options",
                        correct_index,
                        options.len()
                    ));
                }
                Ok(())
            }
            Self::ShortAnswer { keywords } => {
                if keywords.iter().all(|k| k.trim().is_empty()) {
                    return Err("at least one accepted keyword is required".to_string());
                }
                Ok(())
            }
            Self::Practice { solution } => {
                if solution.as_str().trim().is_empty() {
                    return Err("a solution is required".to_string());
                }
                Ok(())
            }
        }
    }
}

/// A quiz question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: u64,
    pub topic: String,
    pub text: String,
    pub explanation: String,
    pub body: QuestionBody,
}

impl Question {
    pub fn kind(&self) -> QuestionType {
        self.body.kind()
    }

    fn from_raw(kind: QuestionType, raw: RawQuestion) -> Result<Self, ModelError> {
        let invalid = |reason: &str| ModelError::InvalidQuestion {
            id: raw.id,
            kind,
            reason: reason.to_string(),
        };

        let (body, explanation) = match kind {
            QuestionType::MultipleChoice | QuestionType::TrueFalse => {
                let options = raw.options.clone().ok_or_else(|| invalid("missing options"))?;
                let correct_index = match raw.correct_answer {
                    Some(RawAnswerKey::Index(index)) => index,
                    _ => return Err(invalid("correctAnswer must be an option index")),
                };
                let body = if kind == QuestionType::MultipleChoice {
                    QuestionBody::MultipleChoice { options, correct_index }
                } else {
                    QuestionBody::TrueFalse { options, correct_index }
                };
                (body, raw.explanation.clone().unwrap_or_default())
            }
            QuestionType::ShortAnswer => {
                let keywords = match &raw.correct_answer {
                    Some(RawAnswerKey::Keywords(keywords)) => keywords.clone(),
                    _ => return Err(invalid("correctAnswer must be a list of keywords")),
                };
                (QuestionBody::ShortAnswer { keywords }, raw.explanation.clone().unwrap_or_default())
            }
            QuestionType::Practice => {
                let solution = raw.solution.clone().ok_or_else(|| invalid("missing solution"))?;
                let body = match (solution.code, solution.correct_answer) {
                    (Some(code), _) => Solution::Code(code),
                    (None, Some(text)) => Solution::Text(text),
                    (None, None) => return Err(invalid("solution has neither code nor correctAnswer")),
                };
                let explanation = if solution.explanation.is_empty() {
                    raw.explanation.clone().unwrap_or_default()
                } else {
                    solution.explanation
                };
                (QuestionBody::Practice { solution: body }, explanation)
            }
        };

        body.check_shape().map_err(|reason| invalid(&reason))?;

        Ok(Self {
            id: raw.id,
            topic: raw.topic,
            text: raw.question,
            explanation,
            body,
        })
    }

    fn to_raw(&self) -> RawQuestion {
        let mut raw = RawQuestion {
            id: self.id,
            topic: self.topic.clone(),
            question: self.text.clone(),
            explanation: None,
            options: None,
            correct_answer: None,
            solution: None,
        };

        match &self.body {
            QuestionBody::MultipleChoice { options, correct_index }
            | QuestionBody::TrueFalse { options, correct_index } => {
                raw.explanation = Some(self.explanation.clone());
                raw.options = Some(options.clone());
                raw.correct_answer = Some(RawAnswerKey::Index(*correct_index));
            }
            QuestionBody::ShortAnswer { keywords } => {
                raw.explanation = Some(self.explanation.clone());
                raw.correct_answer = Some(RawAnswerKey::Keywords(keywords.clone()));
            }
            QuestionBody::Practice { solution } => {
                let (code, correct_answer) = match solution {
                    Solution::Code(code) => (Some(code.clone()), None),
                    Solution::Text(text) => (None, Some(text.clone())),
                };
                raw.solution = Some(RawSolution {
                    code,
                    correct_answer,
                    explanation: self.explanation.clone(),
                });
            }
        }

        raw
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: u64,
    topic: String,
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<RawAnswerKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    solution: Option<RawSolution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAnswerKey {
    Index(usize),
    Keywords(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSolution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<String>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct RawQuizData(IndexMap<String, Vec<RawQuestion>>);

/// Questions of one subject, grouped by type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuizData", into = "RawQuizData")]
pub struct QuizData {
    multiple_choice: Vec<Question>,
    true_false: Vec<Question>,
    short_answer: Vec<Question>,
    practice: Vec<Question>,
}

impl QuizData {
    pub fn bucket(&self, kind: QuestionType) -> &[Question] {
        match kind {
            QuestionType::MultipleChoice => &self.multiple_choice,
            QuestionType::TrueFalse => &self.true_false,
            QuestionType::ShortAnswer => &self.short_answer,
            QuestionType::Practice => &self.practice,
        }
    }

    pub(crate) fn bucket_mut(&mut self, kind: QuestionType) -> &mut Vec<Question> {
        match kind {
            QuestionType::MultipleChoice => &mut self.multiple_choice,
            QuestionType::TrueFalse => &mut self.true_false,
            QuestionType::ShortAnswer => &mut self.short_answer,
            QuestionType::Practice => &mut self.practice,
        }
    }

    /// All questions, bucket by bucket, each bucket in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        QuestionType::ALL.into_iter().flat_map(move |kind| self.bucket(kind).iter())
    }

    pub fn find(&self, id: u64) -> Option<&Question> {
        self.iter().find(|q| q.id == id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.find(id).is_some()
    }

    pub fn len(&self) -> usize {
        QuestionType::ALL.iter().map(|kind| self.bucket(*kind).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a question to the bucket matching its body
    pub(crate) fn push(&mut self, question: Question) {
        self.bucket_mut(question.kind()).push(question);
    }

    /// Remove a question from whichever bucket holds it
    pub(crate) fn remove(&mut self, id: u64) -> Option<Question> {
        for kind in QuestionType::ALL {
            let bucket = self.bucket_mut(kind);
            if let Some(pos) = bucket.iter().position(|q| q.id == id) {
                return Some(bucket.remove(pos));
            }
        }
        None
    }
}

impl TryFrom<RawQuizData> for QuizData {
    type Error = ModelError;

    fn try_from(raw: RawQuizData) -> Result<Self, Self::Error> {
        let mut data = QuizData::default();
        for (key, questions) in raw.0 {
            let kind = QuestionType::from_key(&key).ok_or(ModelError::UnknownQuestionType(key))?;
            for question in questions {
                data.bucket_mut(kind).push(Question::from_raw(kind, question)?);
            }
        }
        Ok(data)
    }
}

impl From<QuizData> for RawQuizData {
    fn from(data: QuizData) -> Self {
        let buckets = QuestionType::ALL
            .into_iter()
            .map(|kind| {
                let questions = data.bucket(kind).iter().map(Question::to_raw).collect();
                (kind.key().to_string(), questions)
            })
            .collect();
        RawQuizData(buckets)
    }
}

/// Sub-category within a subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A two-sided study card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: u64,
    pub topic: String,
    pub front: String,
    pub back: String,
}

/// Top-level exam domain, e.g. a course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: IndexMap<String, Topic>,
    #[serde(default)]
    pub quiz_data: QuizData,
    #[serde(default, rename = "flashcardData")]
    pub flashcards: Vec<Flashcard>,
}

impl Subject {
    pub fn new(name: String, description: String) -> Self {
        Self {
            name,
            description,
            ..Default::default()
        }
    }

    /// Ids of every question and flashcard in the subject
    pub fn item_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.quiz_data
            .iter()
            .map(|q| q.id)
            .chain(self.flashcards.iter().map(|f| f.id))
    }

    pub fn find_flashcard(&self, id: u64) -> Option<&Flashcard> {
        self.flashcards.iter().find(|f| f.id == id)
    }

    /// Whether a question or flashcard already uses the id
    pub fn contains_item(&self, id: u64) -> bool {
        self.quiz_data.contains(id) || self.find_flashcard(id).is_some()
    }

    /// Whether any question or flashcard still points at the topic
    pub fn topic_in_use(&self, topic_id: &str) -> bool {
        self.quiz_data.iter().any(|q| q.topic == topic_id) || self.flashcards.iter().any(|f| f.topic == topic_id)
    }

    /// Display name of a topic, falling back to its id
    pub fn topic_name<'a>(&'a self, topic_id: &'a str) -> &'a str {
        self.topics.get(topic_id).map_or(topic_id, |t| t.name.as_str())
    }
}

/// All subjects, keyed by slug id, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    subjects: IndexMap<String, Subject>,
}

impl Catalog {
    pub fn get(&self, subject_id: &str) -> Option<&Subject> {
        self.subjects.get(subject_id)
    }

    pub(crate) fn get_mut(&mut self, subject_id: &str) -> Option<&mut Subject> {
        self.subjects.get_mut(subject_id)
    }

    pub fn contains(&self, subject_id: &str) -> bool {
        self.subjects.contains_key(subject_id)
    }

    pub fn subjects(&self) -> impl Iterator<Item = (&String, &Subject)> {
        self.subjects.iter()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.subjects.keys().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub(crate) fn insert(&mut self, subject_id: String, subject: Subject) {
        self.subjects.insert(subject_id, subject);
    }

    pub(crate) fn remove(&mut self, subject_id: &str) -> Option<Subject> {
        self.subjects.shift_remove(subject_id)
    }

}

impl FromIterator<(String, Subject)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Subject)>>(iter: I) -> Self {
        Self {
            subjects: iter.into_iter().collect(),
        }
    }
}
