use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat, _use_color: bool) -> Result<()> {
    let (_, subject) = app.subject()?;

    let counts: Vec<(usize, usize)> = subject
        .topics
        .keys()
        .map(|id| {
            let questions = subject.quiz_data.iter().filter(|q| &q.topic == id).count();
            let cards = subject.flashcards.iter().filter(|c| &c.topic == id).count();
            (questions, cards)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = subject
                .topics
                .iter()
                .zip(&counts)
                .map(|((id, topic), (questions, cards))| {
                    serde_json::json!({
                        "id": id,
                        "name": topic.name,
                        "description": topic.description,
                        "questionCount": questions,
                        "flashcardCount": cards,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if subject.topics.is_empty() {
                println!("No topics in {}.", subject.name);
                return Ok(());
            }

            let width = subject.topics.values().map(|t| t.name.len()).max().unwrap_or(5).max(5);
            println!("{:<width$} Questions Cards", "Topic", width = width + 1);
            println!("{} {} {}", "\u{2500}".repeat(width + 1), "\u{2500}".repeat(9), "\u{2500}".repeat(5));
            for ((id, topic), (questions, cards)) in subject.topics.iter().zip(&counts) {
                println!("{:<width$} {:>9} {:>5}  {}", topic.name, questions, cards, id, width = width + 1);
            }
        }
    }

    Ok(())
}

pub fn run_add(app: &mut App, name: &str, description: &str, format: &OutputFormat) -> Result<()> {
    let id = app.workspace.create_topic(name, description)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "id": id, "name": name.trim() }))?);
        }
        OutputFormat::Plain => println!("Created topic \"{}\" ({})", name.trim(), id),
    }

    Ok(())
}

pub fn run_remove(app: &mut App, id: &str, format: &OutputFormat) -> Result<()> {
    let topic_id = app.resolve_topic(id)?;
    app.workspace.delete_topic(&topic_id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "removed": topic_id }))?),
        OutputFormat::Plain => println!("Deleted topic {}", topic_id),
    }

    Ok(())
}
