use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use examprep_lib::catalog::{Flashcard, Question, Subject};
use examprep_lib::{Settings, Workspace};

/// Shared application state for CLI commands
pub struct App {
    pub workspace: Workspace,
}

impl App {
    /// Open the workspace in the given or default data directory
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = Settings::base_dir(data_dir).context("Failed to get data directory")?;
        let settings = Settings::load(&base_dir).context("Failed to read config.toml")?;
        let workspace = Workspace::open(&settings, &base_dir).context("Failed to open data directory")?;
        Ok(Self { workspace })
    }

    /// Current subject, with a hint when there is none
    pub fn subject(&self) -> Result<(&str, &Subject)> {
        match self.workspace.current_subject() {
            Ok(found) => Ok(found),
            Err(_) if self.workspace.catalog().is_empty() => {
                bail!("No subjects yet. Create one with `examprep-cli subjects add <name>`")
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find a question of the current subject by id
    pub fn find_question(&self, id: u64) -> Result<&Question> {
        let (_, subject) = self.subject()?;
        subject
            .quiz_data
            .find(id)
            .with_context(|| format!("No question with id {}", id))
    }

    /// Find a flashcard of the current subject by id
    pub fn find_flashcard(&self, id: u64) -> Result<&Flashcard> {
        let (_, subject) = self.subject()?;
        subject
            .find_flashcard(id)
            .with_context(|| format!("No flashcard with id {}", id))
    }

    /// Resolve a topic given by id or by name (case-insensitive prefix match)
    pub fn resolve_topic(&self, name: &str) -> Result<String> {
        let (_, subject) = self.subject()?;
        if subject.topics.contains_key(name) {
            return Ok(name.to_string());
        }

        let name_lower = name.to_lowercase();
        if let Some((id, _)) = subject.topics.iter().find(|(_, t)| t.name.to_lowercase() == name_lower) {
            return Ok(id.clone());
        }

        let matches: Vec<&String> = subject
            .topics
            .iter()
            .filter(|(_, t)| t.name.to_lowercase().starts_with(&name_lower))
            .map(|(id, _)| id)
            .collect();

        match matches.len() {
            0 => bail!(
                "No topic matching '{}'. Available topics:\n{}",
                name,
                subject
                    .topics
                    .iter()
                    .map(|(id, t)| format!("  - {} ({})", t.name, id))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous topic name '{}'. Matches:\n{}",
                name,
                matches.iter().map(|id| format!("  - {}", id)).collect::<Vec<_>>().join("\n")
            ),
        }
    }
}
