use anyhow::Result;

use examprep_lib::catalog::{Flashcard, NewFlashcard};
use examprep_lib::engine::ContentKind;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

fn print_saved(verb: &str, card: &Flashcard, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(card)?),
        OutputFormat::Plain => {
            println!("{} flashcard {}", verb, card.id);
            println!("  {} / {}", card.front, card.back);
        }
    }
    Ok(())
}

pub fn run_add(app: &mut App, topic: String, front: String, back: String, format: &OutputFormat) -> Result<()> {
    let topic = app.resolve_topic(&topic)?;
    let card = app.workspace.add_flashcard(NewFlashcard { topic, front, back })?;
    print_saved("Added", &card, format)
}

pub fn run_edit(
    app: &mut App,
    id: u64,
    front: Option<String>,
    back: Option<String>,
    topic: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let topic = topic.map(|t| app.resolve_topic(&t)).transpose()?;
    let existing = app.find_flashcard(id)?;
    let input = NewFlashcard {
        topic: topic.unwrap_or_else(|| existing.topic.clone()),
        front: front.unwrap_or_else(|| existing.front.clone()),
        back: back.unwrap_or_else(|| existing.back.clone()),
    };

    let card = app.workspace.update_flashcard(id, input)?;
    print_saved("Updated", &card, format)
}

pub fn run_remove(app: &mut App, id: u64, format: &OutputFormat) -> Result<()> {
    let card = app.workspace.delete_flashcard(id)?;
    print_saved("Deleted", &card, format)
}

pub fn run_list(
    app: &App,
    topic: Option<&str>,
    search: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let topic = topic.map(|t| app.resolve_topic(t)).transpose()?;
    let items = app.workspace.list_content(ContentKind::Flashcards, topic.as_deref(), search)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No flashcards found.");
                return Ok(());
            }

            let (_, subject) = app.subject()?;
            let mut last_topic: Option<&str> = None;
            for item in &items {
                if last_topic != Some(item.topic.as_str()) {
                    println!("{}", paint(subject.topic_name(&item.topic), Color::BOLD, use_color));
                    last_topic = Some(item.topic.as_str());
                }
                println!("  {:>14} {}", item.id, item.text);
            }
            println!("\n{} flashcards", items.len());
        }
    }

    Ok(())
}
