use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let catalog = app.workspace.catalog();
    let current = app.workspace.state().current_subject.as_deref();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = catalog
                .subjects()
                .map(|(id, subject)| {
                    serde_json::json!({
                        "id": id,
                        "name": subject.name,
                        "description": subject.description,
                        "topicCount": subject.topics.len(),
                        "questionCount": subject.quiz_data.len(),
                        "flashcardCount": subject.flashcards.len(),
                        "isCurrent": Some(id.as_str()) == current,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if catalog.is_empty() {
                println!("No subjects yet.");
                return Ok(());
            }

            for (id, subject) in catalog.subjects() {
                let marker = if Some(id.as_str()) == current { "* " } else { "  " };
                println!(
                    "{}{} {} ({} questions, {} flashcards)",
                    marker,
                    paint(&subject.name, Color::BOLD, use_color),
                    paint(&format!("[{}]", id), Color::DIM, use_color),
                    subject.quiz_data.len(),
                    subject.flashcards.len()
                );
                if !subject.description.is_empty() {
                    println!("    {}", subject.description);
                }
            }
        }
    }

    Ok(())
}

pub fn run_add(app: &mut App, name: &str, description: &str, format: &OutputFormat) -> Result<()> {
    let id = app.workspace.create_subject(name, description)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "id": id, "name": name.trim() }))?);
        }
        OutputFormat::Plain => println!("Created subject \"{}\" ({}), now current", name.trim(), id),
    }

    Ok(())
}

pub fn run_remove(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    app.workspace.delete_subject(id)?;
    let current = app.workspace.state().current_subject.clone();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "removed": id, "currentSubject": current });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted subject {}", id);
            if let Some(current) = current {
                println!("  Current subject: {}", current);
            }
        }
    }

    Ok(())
}

pub fn run_use(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    app.workspace.select_subject(id)?;
    let (_, subject) = app.subject()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "currentSubject": id }))?);
        }
        OutputFormat::Plain => println!("Switched to \"{}\"", subject.name),
    }

    Ok(())
}
