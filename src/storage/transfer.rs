//! JSON import and export of the whole catalog
//!
//! Import and export files share one shape: `{ "subjects": { subjectId: Subject } }`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;

use super::file_storage::{Result, StorageError};
use crate::catalog::{Catalog, QuestionType, Subject};

#[derive(Serialize)]
struct ExportDocument<'a> {
    subjects: &'a Catalog,
}

/// What an import changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub subjects_added: usize,
    pub topics_added: usize,
    pub questions_added: usize,
    pub flashcards_added: usize,
    /// Incoming items skipped because their id was already present
    pub duplicates_skipped: usize,
}

impl ImportReport {
    pub fn is_noop(&self) -> bool {
        self.subjects_added == 0 && self.topics_added == 0 && self.questions_added == 0 && self.flashcards_added == 0
    }
}

/// Parse an import document into a catalog without touching any existing one
pub fn parse_import(json: &str) -> Result<Catalog> {
    let mut document: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| StorageError::InvalidDocument(format!("not valid JSON: {}", e)))?;

    let subjects = match document.get_mut("subjects") {
        Some(value) if value.is_object() => value.take(),
        _ => {
            return Err(StorageError::InvalidDocument(
                "expected a \"subjects\" object".to_string(),
            ))
        }
    };

    serde_json::from_value(subjects).map_err(|e| StorageError::InvalidDocument(e.to_string()))
}

/// Read and parse an import file
pub fn read_import_file(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)?;
    parse_import(&content)
}

/// Merge incoming subjects into the catalog.
///
/// Topics, questions and flashcards are added by id, for new subjects as well
/// as existing ones. An incoming item whose id is already present is skipped,
/// never overwritten. Question and flashcard ids share one space per subject.
pub fn import_merge(catalog: &mut Catalog, incoming: Catalog) -> ImportReport {
    let mut report = ImportReport::default();

    for (subject_id, theirs) in incoming.subjects() {
        if !catalog.contains(subject_id) {
            catalog.insert(
                subject_id.clone(),
                Subject::new(theirs.name.clone(), theirs.description.clone()),
            );
            report.subjects_added += 1;
        }
        let Some(ours) = catalog.get_mut(subject_id) else {
            continue;
        };

        for (topic_id, topic) in &theirs.topics {
            if ours.topics.contains_key(topic_id) {
                report.duplicates_skipped += 1;
            } else {
                ours.topics.insert(topic_id.clone(), topic.clone());
                report.topics_added += 1;
            }
        }

        for kind in QuestionType::ALL {
            for question in theirs.quiz_data.bucket(kind) {
                if ours.contains_item(question.id) {
                    report.duplicates_skipped += 1;
                } else {
                    ours.quiz_data.push(question.clone());
                    report.questions_added += 1;
                }
            }
        }

        for card in &theirs.flashcards {
            if ours.contains_item(card.id) {
                report.duplicates_skipped += 1;
            } else {
                ours.flashcards.push(card.clone());
                report.flashcards_added += 1;
            }
        }
    }

    report
}

/// Serialize the catalog as an export document
pub fn export_json(catalog: &Catalog) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportDocument { subjects: catalog })?)
}

/// Date-stamped export file name, e.g. `exam_prep_data_2026-10-19.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("exam_prep_data_{}.json", date.format("%Y-%m-%d"))
}

/// Write an export document into `dir` and return its path
pub fn export_to_dir(catalog: &Catalog, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    fs::write(&path, export_json(catalog)?)?;
    log::info!("Exported {} subjects to {:?}", catalog.len(), path);
    Ok(path)
}
