use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_import(app: &mut App, file: &Path, format: &OutputFormat) -> Result<()> {
    let report = app
        .workspace
        .import_file(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            if report.is_noop() {
                println!("Nothing new to import.");
            } else {
                println!("Imported from {}", file.display());
                println!("  Subjects:   {}", report.subjects_added);
                println!("  Topics:     {}", report.topics_added);
                println!("  Questions:  {}", report.questions_added);
                println!("  Flashcards: {}", report.flashcards_added);
            }
            if report.duplicates_skipped > 0 {
                println!("  Skipped {} items already present", report.duplicates_skipped);
            }
        }
    }

    Ok(())
}

pub fn run_export(app: &App, out: Option<PathBuf>, format: &OutputFormat) -> Result<()> {
    let dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let path = app.workspace.export_to_dir(&dir).context("Failed to export")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "path": path.to_string_lossy() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Exported to {}", path.display()),
    }

    Ok(())
}
