//! Quiz and flashcard navigation over the session state
//!
//! Derived lists (filtered questions and cards) are recomputed from the
//! catalog on every call, so the state only stores positions and filters.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use thiserror::Error;

use super::models::*;
use crate::catalog::{Catalog, Flashcard, Question, QuestionType, Subject};
use crate::engine::{self, Answer, Grade, GradingError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No subject selected")]
    NoSubject,

    #[error("Subject not found: {0}")]
    SubjectNotFound(String),

    #[error("No questions match the current filters")]
    EmptyQuiz,

    #[error("No flashcards match the current filter")]
    EmptyDeck,

    #[error("Question {0} was already answered in this run")]
    AlreadyAnswered(u64),

    #[error("Answer the current question before moving on")]
    NotAnswered,

    #[error("All questions are done; restart the quiz to go again")]
    RunFinished,

    #[error(transparent)]
    Grading(#[from] GradingError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Where the quiz went after `next_question`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this index
    Question(usize),
    /// The list was exhausted; the run was summarized into the history
    Finished(SessionSummary),
}

impl SessionState {
    // ===== Subject selection =====

    pub fn subject<'c>(&self, catalog: &'c Catalog) -> Result<&'c Subject> {
        let id = self.current_subject.as_deref().ok_or(SessionError::NoSubject)?;
        catalog
            .get(id)
            .ok_or_else(|| SessionError::SubjectNotFound(id.to_string()))
    }

    /// Switch subject and reset both views to their unfiltered start
    pub fn select_subject(&mut self, catalog: &Catalog, subject_id: &str) -> Result<()> {
        if !catalog.contains(subject_id) {
            return Err(SessionError::SubjectNotFound(subject_id.to_string()));
        }

        self.current_subject = Some(subject_id.to_string());
        self.quiz.current_index = 0;
        self.quiz.type_filter = None;
        self.quiz.topic_filter = None;
        self.flashcards.current_index = 0;
        self.flashcards.topic_filter = None;
        self.start_run();
        Ok(())
    }

    /// Make sure the current subject exists, falling back to the first one
    pub fn ensure_subject(&mut self, catalog: &Catalog) {
        let valid = self
            .current_subject
            .as_deref()
            .is_some_and(|id| catalog.contains(id));
        if valid {
            return;
        }

        match catalog.first_id().map(str::to_string) {
            Some(first) => {
                // cannot fail: the id comes from the catalog
                let _ = self.select_subject(catalog, &first);
            }
            None => self.current_subject = None,
        }
    }

    /// Drop everything recorded for a subject
    pub fn forget_subject(&mut self, subject_id: &str) {
        self.quiz.answered.shift_remove(subject_id);
        self.flashcards.known.shift_remove(subject_id);
        self.flashcards.review.shift_remove(subject_id);
        self.history.shift_remove(subject_id);
        if self.current_subject.as_deref() == Some(subject_id) {
            self.current_subject = None;
        }
    }

    /// Pull indices back to the start when edits shrank the filtered lists
    pub fn clamp_positions(&mut self, catalog: &Catalog) {
        let question_count = self.filtered_questions(catalog).map_or(0, |q| q.len());
        if self.quiz.current_index >= question_count {
            self.quiz.current_index = 0;
        }
        let card_count = self.filtered_flashcards(catalog).map_or(0, |c| c.len());
        if self.flashcards.current_index >= card_count {
            self.flashcards.current_index = 0;
        }
    }

    // ===== Quiz =====

    /// Cumulative answer log of a subject
    pub fn answered(&self, subject_id: &str) -> &[AnsweredRecord] {
        self.quiz.answered.get(subject_id).map_or(&[], Vec::as_slice)
    }

    /// Records of the current subject written since the run started
    pub fn run_records(&self) -> &[AnsweredRecord] {
        let Some(subject_id) = self.current_subject.as_deref() else {
            return &[];
        };
        let log = self.answered(subject_id);
        &log[self.quiz.run_start.min(log.len())..]
    }

    pub fn history(&self, subject_id: &str) -> &[SessionSummary] {
        self.history.get(subject_id).map_or(&[], Vec::as_slice)
    }

    fn start_run(&mut self) {
        self.quiz.run_start = self
            .current_subject
            .as_deref()
            .map_or(0, |id| self.answered(id).len());
        self.quiz.finished = false;
    }

    pub fn set_quiz_filter(&mut self, kind: Option<QuestionType>, topic: Option<String>) {
        self.quiz.type_filter = kind;
        self.quiz.topic_filter = topic;
        self.quiz.current_index = 0;
        self.start_run();
    }

    pub fn restart_quiz(&mut self) {
        self.quiz.current_index = 0;
        self.start_run();
    }

    pub fn filtered_questions<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Question>> {
        let subject = self.subject(catalog)?;
        Ok(engine::filter_questions(
            subject,
            self.quiz.type_filter,
            self.quiz.topic_filter.as_deref(),
        ))
    }

    /// Question at the current index, `None` when the filtered list is empty
    pub fn current_question<'c>(&self, catalog: &'c Catalog) -> Result<Option<&'c Question>> {
        let questions = self.filtered_questions(catalog)?;
        Ok(questions.get(self.quiz.current_index).copied())
    }

    pub fn is_answered_in_run(&self, question_id: u64) -> bool {
        self.run_records().iter().any(|r| r.question_id == question_id)
    }

    /// Grade an answer to the current question and log it
    pub fn submit_answer(&mut self, catalog: &Catalog, answer: &Answer) -> Result<Grade> {
        if self.quiz.finished {
            return Err(SessionError::RunFinished);
        }
        let question = self.current_question(catalog)?.ok_or(SessionError::EmptyQuiz)?;
        if self.is_answered_in_run(question.id) {
            return Err(SessionError::AlreadyAnswered(question.id));
        }

        let grade = engine::grade(question, answer)?;
        let record = AnsweredRecord {
            question_id: question.id,
            is_correct: grade.is_correct,
            topic: question.topic.clone(),
        };

        let subject_id = self.current_subject.clone().ok_or(SessionError::NoSubject)?;
        self.quiz.answered.entry(subject_id).or_default().push(record);
        Ok(grade)
    }

    /// Move past an answered question, summarizing the run at the end
    pub fn next_question(&mut self, catalog: &Catalog, today: NaiveDate) -> Result<Advance> {
        if self.quiz.finished {
            return Err(SessionError::RunFinished);
        }
        let questions = self.filtered_questions(catalog)?;
        let question = questions
            .get(self.quiz.current_index)
            .ok_or(SessionError::EmptyQuiz)?;
        if !self.is_answered_in_run(question.id) {
            return Err(SessionError::NotAnswered);
        }

        if self.quiz.current_index + 1 < questions.len() {
            self.quiz.current_index += 1;
            return Ok(Advance::Question(self.quiz.current_index));
        }

        let run = self.run_records();
        let summary = SessionSummary {
            date: today,
            questions_answered: run.len(),
            correct_answers: run.iter().filter(|r| r.is_correct).count(),
            accuracy: engine::compute_accuracy(run),
        };

        let subject_id = self.current_subject.clone().ok_or(SessionError::NoSubject)?;
        log::info!(
            "Finished quiz run for {}: {}/{} correct",
            subject_id,
            summary.correct_answers,
            summary.questions_answered
        );
        self.history.entry(subject_id).or_default().push(summary.clone());
        self.quiz.finished = true;
        Ok(Advance::Finished(summary))
    }

    /// Progress of the current run through the filtered list
    pub fn run_progress(&self, catalog: &Catalog) -> Result<u32> {
        let total = self.filtered_questions(catalog)?.len();
        Ok(engine::progress_percent(self.run_records().len(), total))
    }

    // ===== Flashcards =====

    pub fn set_flashcard_topic(&mut self, topic: Option<String>) {
        self.flashcards.topic_filter = topic;
        self.flashcards.current_index = 0;
    }

    pub fn filtered_flashcards<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Flashcard>> {
        let subject = self.subject(catalog)?;
        Ok(engine::filter_flashcards(subject, self.flashcards.topic_filter.as_deref()))
    }

    pub fn current_flashcard<'c>(&self, catalog: &'c Catalog) -> Result<Option<&'c Flashcard>> {
        let cards = self.filtered_flashcards(catalog)?;
        Ok(cards.get(self.flashcards.current_index).copied())
    }

    /// Step forward; returns `false` once the last card has been reached
    pub fn next_flashcard(&mut self, catalog: &Catalog) -> Result<bool> {
        let count = self.filtered_flashcards(catalog)?.len();
        if self.flashcards.current_index + 1 < count {
            self.flashcards.current_index += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn prev_flashcard(&mut self) -> bool {
        if self.flashcards.current_index > 0 {
            self.flashcards.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// Tag a card; known and review are mutually exclusive
    pub fn mark_card(&mut self, subject_id: &str, card_id: u64, mark: CardMark) {
        let (add_to, remove_from) = match mark {
            CardMark::Known => (&mut self.flashcards.known, &mut self.flashcards.review),
            CardMark::Review => (&mut self.flashcards.review, &mut self.flashcards.known),
        };

        add_to.entry(subject_id.to_string()).or_default().insert(card_id);
        if let Some(set) = remove_from.get_mut(subject_id) {
            set.remove(&card_id);
        }
    }

    /// Tag the card currently shown
    pub fn mark_current_card(&mut self, catalog: &Catalog, mark: CardMark) -> Result<u64> {
        let card_id = self
            .current_flashcard(catalog)?
            .map(|c| c.id)
            .ok_or(SessionError::EmptyDeck)?;
        let subject_id = self.current_subject.clone().ok_or(SessionError::NoSubject)?;
        self.mark_card(&subject_id, card_id, mark);
        Ok(card_id)
    }

    pub fn card_mark(&self, subject_id: &str, card_id: u64) -> Option<CardMark> {
        let has = |sets: &IndexMap<String, BTreeSet<u64>>| {
            sets.get(subject_id).is_some_and(|s| s.contains(&card_id))
        };
        if has(&self.flashcards.known) {
            Some(CardMark::Known)
        } else if has(&self.flashcards.review) {
            Some(CardMark::Review)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewFlashcard, NewQuestion, QuestionBody};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn setup() -> (Catalog, SessionState, String) {
        let mut catalog = Catalog::default();
        let subject = catalog.create_subject("Computer I/O", "").unwrap();
        catalog.create_topic(&subject, "Buses", "").unwrap();
        catalog.create_topic(&subject, "Caches", "").unwrap();

        catalog
            .add_question(
                &subject,
                NewQuestion {
                    topic: "buses".to_string(),
                    text: "Which bus is serial?".to_string(),
                    explanation: "PCIe lanes are serial.".to_string(),
                    body: QuestionBody::MultipleChoice {
                        options: vec!["PCI".to_string(), "PCIe".to_string()],
                        correct_index: 1,
                    },
                },
            )
            .unwrap();
        catalog
            .add_question(
                &subject,
                NewQuestion {
                    topic: "caches".to_string(),
                    text: "Why is the second read faster?".to_string(),
                    explanation: "Caching.".to_string(),
                    body: QuestionBody::ShortAnswer {
                        keywords: vec!["cache".to_string()],
                    },
                },
            )
            .unwrap();

        for front in ["L1", "L2", "L3"] {
            catalog
                .add_flashcard(
                    &subject,
                    NewFlashcard {
                        topic: "caches".to_string(),
                        front: front.to_string(),
                        back: "cache level".to_string(),
                    },
                )
                .unwrap();
        }

        let mut state = SessionState::default();
        state.ensure_subject(&catalog);
        (catalog, state, subject)
    }

    #[test]
    fn test_ensure_subject_picks_first() {
        let (_, state, subject) = setup();
        assert_eq!(state.current_subject.as_deref(), Some(subject.as_str()));

        let mut empty = SessionState {
            current_subject: Some("gone".to_string()),
            ..Default::default()
        };
        empty.ensure_subject(&Catalog::default());
        assert!(empty.current_subject.is_none());
    }

    #[test]
    fn test_full_run_records_summary() {
        let (catalog, mut state, subject) = setup();

        let grade = state.submit_answer(&catalog, &Answer::Choice(1)).unwrap();
        assert!(grade.is_correct);
        assert!(matches!(
            state.submit_answer(&catalog, &Answer::Choice(0)),
            Err(SessionError::AlreadyAnswered(_))
        ));
        assert_eq!(state.run_progress(&catalog).unwrap(), 50);

        assert_eq!(state.next_question(&catalog, today()).unwrap(), Advance::Question(1));
        assert!(matches!(
            state.next_question(&catalog, today()),
            Err(SessionError::NotAnswered)
        ));

        let grade = state
            .submit_answer(&catalog, &Answer::Text("no clue".to_string()))
            .unwrap();
        assert!(!grade.is_correct);

        let Advance::Finished(summary) = state.next_question(&catalog, today()).unwrap() else {
            panic!("expected the run to finish");
        };
        assert_eq!(summary.questions_answered, 2);
        assert_eq!(summary.correct_answers, 1);
        assert_eq!(summary.accuracy, 50);
        assert_eq!(state.history(&subject), &[summary]);
        assert!(matches!(
            state.next_question(&catalog, today()),
            Err(SessionError::RunFinished)
        ));
    }

    #[test]
    fn test_progress_stays_within_bounds_after_delete() {
        let (mut catalog, mut state, subject) = setup();
        state.submit_answer(&catalog, &Answer::Choice(1)).unwrap();
        state.next_question(&catalog, today()).unwrap();
        state
            .submit_answer(&catalog, &Answer::Text("a cache".to_string()))
            .unwrap();

        let answered_id = catalog.get(&subject).unwrap().quiz_data.bucket(QuestionType::MultipleChoice)[0].id;
        catalog.delete_question(&subject, answered_id).unwrap();
        state.clamp_positions(&catalog);

        assert_eq!(state.run_records().len(), 2);
        assert_eq!(state.filtered_questions(&catalog).unwrap().len(), 1);
        assert_eq!(state.run_progress(&catalog).unwrap(), 100);
    }

    #[test]
    fn test_restart_starts_new_run_but_keeps_log() {
        let (catalog, mut state, subject) = setup();
        state.submit_answer(&catalog, &Answer::Choice(0)).unwrap();

        state.restart_quiz();
        assert!(state.run_records().is_empty());
        assert_eq!(state.answered(&subject).len(), 1);

        // the same question may be answered again in the new run
        state.submit_answer(&catalog, &Answer::Choice(1)).unwrap();
        assert_eq!(state.answered(&subject).len(), 2);
        assert_eq!(state.run_records().len(), 1);
    }

    #[test]
    fn test_filter_resets_index_and_empty_state() {
        let (catalog, mut state, _) = setup();
        state.set_quiz_filter(Some(QuestionType::Practice), None);
        assert!(state.current_question(&catalog).unwrap().is_none());
        assert!(matches!(
            state.submit_answer(&catalog, &Answer::Text("x".to_string())),
            Err(SessionError::EmptyQuiz)
        ));

        state.set_quiz_filter(None, Some("caches".to_string()));
        let question = state.current_question(&catalog).unwrap().unwrap();
        assert_eq!(question.topic, "caches");
    }

    #[test]
    fn test_invalid_answer_writes_nothing() {
        let (catalog, mut state, subject) = setup();
        assert!(matches!(
            state.submit_answer(&catalog, &Answer::Choice(7)),
            Err(SessionError::Grading(_))
        ));
        assert!(state.answered(&subject).is_empty());
    }

    #[test]
    fn test_flashcard_navigation() {
        let (catalog, mut state, _) = setup();
        assert!(!state.prev_flashcard());
        assert!(state.next_flashcard(&catalog).unwrap());
        assert!(state.next_flashcard(&catalog).unwrap());
        assert!(!state.next_flashcard(&catalog).unwrap());
        assert_eq!(state.current_flashcard(&catalog).unwrap().unwrap().front, "L3");

        state.set_flashcard_topic(Some("buses".to_string()));
        assert!(state.current_flashcard(&catalog).unwrap().is_none());
        assert!(matches!(
            state.mark_current_card(&catalog, CardMark::Known),
            Err(SessionError::EmptyDeck)
        ));
    }

    #[test]
    fn test_mark_card_mutually_exclusive() {
        let (catalog, mut state, subject) = setup();
        let card = state.mark_current_card(&catalog, CardMark::Known).unwrap();
        assert_eq!(state.card_mark(&subject, card), Some(CardMark::Known));

        state.mark_card(&subject, card, CardMark::Review);
        assert_eq!(state.card_mark(&subject, card), Some(CardMark::Review));
        assert!(!state.flashcards.known[&subject].contains(&card));

        state.mark_card(&subject, card, CardMark::Known);
        assert!(!state.flashcards.review[&subject].contains(&card));
        assert_eq!(state.card_mark(&subject, 42), None);
    }

    #[test]
    fn test_select_subject_resets_filters() {
        let (mut catalog, mut state, _) = setup();
        let other = catalog.create_subject("Networks", "").unwrap();
        state.set_quiz_filter(Some(QuestionType::ShortAnswer), Some("caches".to_string()));
        state.set_flashcard_topic(Some("caches".to_string()));

        state.select_subject(&catalog, &other).unwrap();
        assert_eq!(state.quiz.type_filter, None);
        assert_eq!(state.quiz.topic_filter, None);
        assert_eq!(state.flashcards.topic_filter, None);
        assert!(state.select_subject(&catalog, "nope").is_err());
    }

    #[test]
    fn test_forget_subject() {
        let (catalog, mut state, subject) = setup();
        state.submit_answer(&catalog, &Answer::Choice(1)).unwrap();
        state.mark_card(&subject, 1, CardMark::Review);

        state.forget_subject(&subject);
        assert!(state.answered(&subject).is_empty());
        assert_eq!(state.card_mark(&subject, 1), None);
        assert!(state.current_subject.is_none());
    }
}
