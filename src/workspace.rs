//! The central store
//!
//! `Workspace` owns the catalog, the session state and the persistence
//! adapter. Every mutation goes through one of its methods and ends with a
//! whole-document snapshot of both stores.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, Flashcard, NewFlashcard, NewQuestion, Question, QuestionType, Subject};
use crate::config::Settings;
use crate::engine::{self, Answer, ContentItem, ContentKind, Grade, SubjectStats};
use crate::session::{Advance, CardMark, SessionError, SessionState, SessionSummary};
use crate::storage::{self, ImportReport, JsonStore, StorageError};

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, WorkspaceError>;

pub struct Workspace {
    store: JsonStore,
    catalog: Catalog,
    state: SessionState,
}

fn read_seed(path: &Path) -> Catalog {
    match storage::load_seed(path) {
        Ok(seed) => seed.unwrap_or_default(),
        Err(e) => {
            log::warn!("Failed to load seed data: {}", e);
            Catalog::default()
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Workspace {
    /// Open the workspace described by the settings
    pub fn open(settings: &Settings, base_dir: &Path) -> Result<Self> {
        let data_dir = settings.data_dir(base_dir);
        let store = JsonStore::new(data_dir.clone()).with_pretty(settings.pretty_json);
        store.init()?;
        Ok(Self::load(store, Some(&settings.seed_path(&data_dir))))
    }

    /// Build from a store.
    ///
    /// A persisted catalog is used as is; the seed only fills an empty store.
    pub fn load(store: JsonStore, seed_path: Option<&Path>) -> Self {
        let (mut state, persisted) = store.load();
        let catalog = match persisted {
            Some(catalog) => catalog,
            None => seed_path.map_or_else(Catalog::default, read_seed),
        };

        state.ensure_subject(&catalog);
        state.clamp_positions(&catalog);

        Self { store, catalog, state }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn data_dir(&self) -> &Path {
        self.store.base_path()
    }

    /// Snapshot both documents
    pub fn save(&self) -> Result<()> {
        self.store.save(&self.state, &self.catalog)?;
        Ok(())
    }

    /// The subject every view and authoring action applies to
    pub fn current_subject(&self) -> Result<(&str, &Subject)> {
        let id = self.state.current_subject.as_deref().ok_or(SessionError::NoSubject)?;
        Ok((id, self.catalog.subject(id)?))
    }

    fn current_subject_id(&self) -> Result<String> {
        Ok(self
            .state
            .current_subject
            .clone()
            .ok_or(SessionError::NoSubject)?)
    }

    // ===== Subjects and topics =====

    /// Create a subject and make it the current one
    pub fn create_subject(&mut self, name: &str, description: &str) -> Result<String> {
        let id = self.catalog.create_subject(name, description)?;
        self.state.select_subject(&self.catalog, &id)?;
        self.save()?;
        Ok(id)
    }

    pub fn delete_subject(&mut self, subject_id: &str) -> Result<()> {
        self.catalog.delete_subject(subject_id)?;
        self.state.forget_subject(subject_id);
        self.state.ensure_subject(&self.catalog);
        self.save()
    }

    pub fn select_subject(&mut self, subject_id: &str) -> Result<()> {
        self.state.select_subject(&self.catalog, subject_id)?;
        self.save()
    }

    pub fn create_topic(&mut self, name: &str, description: &str) -> Result<String> {
        let subject_id = self.current_subject_id()?;
        let id = self.catalog.create_topic(&subject_id, name, description)?;
        self.save()?;
        Ok(id)
    }

    pub fn delete_topic(&mut self, topic_id: &str) -> Result<()> {
        let subject_id = self.current_subject_id()?;
        self.catalog.delete_topic(&subject_id, topic_id)?;
        self.save()
    }

    // ===== Authoring =====

    pub fn add_question(&mut self, input: NewQuestion) -> Result<Question> {
        let subject_id = self.current_subject_id()?;
        let question = self.catalog.add_question(&subject_id, input)?;
        self.save()?;
        Ok(question)
    }

    pub fn update_question(&mut self, question_id: u64, input: NewQuestion) -> Result<Question> {
        let subject_id = self.current_subject_id()?;
        let question = self.catalog.update_question(&subject_id, question_id, input)?;
        self.state.clamp_positions(&self.catalog);
        self.save()?;
        Ok(question)
    }

    pub fn delete_question(&mut self, question_id: u64) -> Result<Question> {
        let subject_id = self.current_subject_id()?;
        let question = self.catalog.delete_question(&subject_id, question_id)?;
        self.state.clamp_positions(&self.catalog);
        self.save()?;
        Ok(question)
    }

    pub fn add_flashcard(&mut self, input: NewFlashcard) -> Result<Flashcard> {
        let subject_id = self.current_subject_id()?;
        let card = self.catalog.add_flashcard(&subject_id, input)?;
        self.save()?;
        Ok(card)
    }

    pub fn update_flashcard(&mut self, card_id: u64, input: NewFlashcard) -> Result<Flashcard> {
        let subject_id = self.current_subject_id()?;
        let card = self.catalog.update_flashcard(&subject_id, card_id, input)?;
        self.state.clamp_positions(&self.catalog);
        self.save()?;
        Ok(card)
    }

    pub fn delete_flashcard(&mut self, card_id: u64) -> Result<Flashcard> {
        let subject_id = self.current_subject_id()?;
        let card = self.catalog.delete_flashcard(&subject_id, card_id)?;
        self.state.clamp_positions(&self.catalog);
        self.save()?;
        Ok(card)
    }

    // ===== Quiz =====

    pub fn current_question(&self) -> Result<Option<&Question>> {
        Ok(self.state.current_question(&self.catalog)?)
    }

    pub fn filtered_questions(&self) -> Result<Vec<&Question>> {
        Ok(self.state.filtered_questions(&self.catalog)?)
    }

    pub fn set_quiz_filter(&mut self, kind: Option<QuestionType>, topic: Option<String>) -> Result<()> {
        self.state.set_quiz_filter(kind, topic);
        self.save()
    }

    pub fn submit_answer(&mut self, answer: &Answer) -> Result<Grade> {
        let grade = self.state.submit_answer(&self.catalog, answer)?;
        self.save()?;
        Ok(grade)
    }

    pub fn next_question(&mut self) -> Result<Advance> {
        let advance = self.state.next_question(&self.catalog, today())?;
        self.save()?;
        Ok(advance)
    }

    pub fn restart_quiz(&mut self) -> Result<()> {
        self.state.restart_quiz();
        self.save()
    }

    pub fn run_progress(&self) -> Result<u32> {
        Ok(self.state.run_progress(&self.catalog)?)
    }

    // ===== Flashcards =====

    pub fn current_flashcard(&self) -> Result<Option<&Flashcard>> {
        Ok(self.state.current_flashcard(&self.catalog)?)
    }

    pub fn filtered_flashcards(&self) -> Result<Vec<&Flashcard>> {
        Ok(self.state.filtered_flashcards(&self.catalog)?)
    }

    pub fn set_flashcard_topic(&mut self, topic: Option<String>) -> Result<()> {
        self.state.set_flashcard_topic(topic);
        self.save()
    }

    pub fn next_flashcard(&mut self) -> Result<bool> {
        let moved = self.state.next_flashcard(&self.catalog)?;
        self.save()?;
        Ok(moved)
    }

    pub fn prev_flashcard(&mut self) -> Result<bool> {
        let moved = self.state.prev_flashcard();
        self.save()?;
        Ok(moved)
    }

    pub fn mark_card(&mut self, mark: CardMark) -> Result<u64> {
        let card_id = self.state.mark_current_card(&self.catalog, mark)?;
        self.save()?;
        Ok(card_id)
    }

    /// Authoring listing for the current subject
    pub fn list_content(&self, kind: ContentKind, topic: Option<&str>, search: Option<&str>) -> Result<Vec<ContentItem>> {
        let (_, subject) = self.current_subject()?;
        Ok(engine::list_content(subject, kind, topic, search))
    }

    // ===== Progress =====

    pub fn stats(&self) -> Result<SubjectStats> {
        let (subject_id, subject) = self.current_subject()?;
        Ok(engine::subject_stats(subject, self.state.answered(subject_id)))
    }

    pub fn history(&self) -> Result<&[SessionSummary]> {
        let (subject_id, _) = self.current_subject()?;
        Ok(self.state.history(subject_id))
    }

    // ===== Import / export =====

    /// Merge an import document; a malformed document changes nothing
    pub fn import_str(&mut self, json: &str) -> Result<ImportReport> {
        let incoming = storage::parse_import(json)?;
        let report = storage::import_merge(&mut self.catalog, incoming);
        self.state.ensure_subject(&self.catalog);
        self.save()?;
        log::info!(
            "Imported {} subjects, {} topics, {} questions, {} flashcards ({} duplicates skipped)",
            report.subjects_added,
            report.topics_added,
            report.questions_added,
            report.flashcards_added,
            report.duplicates_skipped
        );
        Ok(report)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<ImportReport> {
        let content = std::fs::read_to_string(path).map_err(StorageError::from)?;
        self.import_str(&content)
    }

    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        Ok(storage::export_to_dir(&self.catalog, dir, today())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionBody;
    use std::fs;
    use tempfile::TempDir;

    fn open(temp: &TempDir) -> Workspace {
        let settings = Settings::default();
        Workspace::open(&settings, temp.path()).unwrap()
    }

    fn question(topic: &str, text: &str) -> NewQuestion {
        NewQuestion {
            topic: topic.to_string(),
            text: text.to_string(),
            explanation: "Explained.".to_string(),
            body: QuestionBody::true_false(true),
        }
    }

    #[test]
    fn test_mutations_persist() {
        let temp = TempDir::new().unwrap();
        {
            let mut ws = open(&temp);
            ws.create_subject("Databases", "").unwrap();
            ws.create_topic("Indexes", "").unwrap();
            ws.add_question(question("indexes", "B-trees are balanced")).unwrap();
            ws.submit_answer(&Answer::Choice(0)).unwrap();
        }

        let ws = open(&temp);
        assert_eq!(ws.state().current_subject.as_deref(), Some("databases"));
        assert_eq!(ws.catalog().get("databases").unwrap().quiz_data.len(), 1);
        assert_eq!(ws.stats().unwrap().accuracy, 100);
    }

    const SEED: &str = r#"{
        "computer-io": { "name": "Computer I/O", "topics": {}, "quizData": {}, "flashcardData": [] },
        "networks": { "name": "Networks", "topics": {}, "quizData": {}, "flashcardData": [] }
    }"#;

    #[test]
    fn test_seed_fills_empty_store_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.json"), SEED).unwrap();

        {
            let mut ws = open(&temp);
            assert_eq!(ws.state().current_subject.as_deref(), Some("computer-io"));
            ws.create_topic("Interrupts", "").unwrap();
        }

        fs::write(
            temp.path().join("data.json"),
            r#"{ "compilers": { "name": "Compilers", "topics": {}, "quizData": {}, "flashcardData": [] } }"#,
        )
        .unwrap();

        let ws = open(&temp);
        assert_eq!(ws.catalog().len(), 2);
        assert!(!ws.catalog().contains("compilers"));
        assert!(ws.catalog().get("computer-io").unwrap().topics.contains_key("interrupts"));
    }

    #[test]
    fn test_deleted_seed_subject_stays_deleted() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.json"), SEED).unwrap();

        {
            let mut ws = open(&temp);
            ws.delete_subject("networks").unwrap();
        }

        let mut ws = open(&temp);
        assert!(!ws.catalog().contains("networks"));
        assert!(ws.catalog().contains("computer-io"));

        ws.delete_subject("computer-io").unwrap();
        drop(ws);
        let ws = open(&temp);
        assert!(ws.catalog().is_empty());
        assert!(ws.state().current_subject.is_none());
    }

    #[test]
    fn test_corrupt_catalog_falls_back_to_seed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.json"), SEED).unwrap();
        fs::write(temp.path().join("catalog.json"), "{ broken").unwrap();

        let ws = open(&temp);
        assert_eq!(ws.catalog().len(), 2);
        assert!(temp.path().join("catalog.json.corrupt").exists());
    }

    #[test]
    fn test_broken_seed_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data.json"), "oops").unwrap();
        let ws = open(&temp);
        assert!(ws.catalog().is_empty());
        assert!(ws.state().current_subject.is_none());
    }

    #[test]
    fn test_malformed_import_leaves_catalog_unchanged() {
        let temp = TempDir::new().unwrap();
        let mut ws = open(&temp);
        ws.create_subject("Databases", "").unwrap();
        let before = ws.catalog().clone();

        let result = ws.import_str(r#"{ "data": {} }"#);
        assert!(matches!(
            result,
            Err(WorkspaceError::Storage(StorageError::InvalidDocument(_)))
        ));
        assert_eq!(ws.catalog(), &before);
    }

    #[test]
    fn test_export_then_import_elsewhere() {
        let temp = TempDir::new().unwrap();
        let mut ws = open(&temp);
        ws.create_subject("Databases", "").unwrap();
        ws.create_topic("Joins", "").unwrap();
        ws.add_question(question("joins", "A hash join needs equality")).unwrap();
        let path = ws.export_to_dir(&temp.path().join("exports")).unwrap();

        let other = TempDir::new().unwrap();
        let mut fresh = open(&other);
        let report = fresh.import_file(&path).unwrap();
        assert_eq!(report.subjects_added, 1);
        assert_eq!(fresh.state().current_subject.as_deref(), Some("databases"));
        assert_eq!(fresh.catalog(), ws.catalog());
    }

    #[test]
    fn test_add_after_importing_max_id() {
        let temp = TempDir::new().unwrap();
        let mut ws = open(&temp);
        ws.import_str(
            r#"{ "subjects": { "systems": {
                "name": "Systems",
                "topics": { "io": { "name": "I/O" } },
                "flashcardData": [
                    { "id": 18446744073709551615, "topic": "io", "front": "DMA", "back": "Direct Memory Access" }
                ]
            } } }"#,
        )
        .unwrap();

        let card = ws
            .add_flashcard(NewFlashcard {
                topic: "io".to_string(),
                front: "IRQ".to_string(),
                back: "Interrupt request".to_string(),
            })
            .unwrap();
        assert_eq!(card.id, 1);
        assert_eq!(ws.catalog().get("systems").unwrap().flashcards.len(), 2);
    }

    #[test]
    fn test_delete_subject_forgets_progress() {
        let temp = TempDir::new().unwrap();
        let mut ws = open(&temp);
        ws.create_subject("First", "").unwrap();
        ws.create_subject("Second", "").unwrap();

        ws.delete_subject("second").unwrap();
        assert_eq!(ws.state().current_subject.as_deref(), Some("first"));
        assert!(ws.delete_subject("second").is_err());
    }

    #[test]
    fn test_delete_current_question_clamps_index() {
        let temp = TempDir::new().unwrap();
        let mut ws = open(&temp);
        ws.create_subject("Databases", "").unwrap();
        ws.create_topic("Joins", "").unwrap();
        ws.add_question(question("joins", "One")).unwrap();
        let second = ws.add_question(question("joins", "Two")).unwrap();

        ws.submit_answer(&Answer::Choice(0)).unwrap();
        ws.next_question().unwrap();
        assert_eq!(ws.current_question().unwrap().unwrap().id, second.id);

        ws.delete_question(second.id).unwrap();
        assert_eq!(ws.current_question().unwrap().unwrap().text, "One");
    }
}
