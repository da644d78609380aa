use anyhow::Result;

use examprep_lib::session::CardMark;

use crate::app::App;
use crate::render::terminal;
use crate::{MarkArg, OutputFormat};

pub fn run_show(app: &App, flip: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    let (subject_id, subject) = app.subject()?;
    let state = app.workspace.state();
    let cards = app.workspace.filtered_flashcards()?;
    let current = app.workspace.current_flashcard()?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "index": state.flashcards.current_index,
                "total": cards.len(),
                "card": current.map(|c| serde_json::json!({
                    "id": c.id,
                    "topic": c.topic,
                    "front": c.front,
                    "back": if flip { Some(&c.back) } else { None },
                    "mark": state.card_mark(subject_id, c.id),
                })),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match current {
            Some(card) => println!(
                "{}",
                terminal::render_flashcard(
                    card,
                    subject,
                    state.flashcards.current_index,
                    cards.len(),
                    state.card_mark(subject_id, card.id),
                    flip,
                    use_color,
                )
            ),
            None => println!("No flashcards match the current filter."),
        },
    }

    Ok(())
}

pub fn run_filter(app: &mut App, topic: Option<String>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let topic = topic.map(|t| app.resolve_topic(&t)).transpose()?;
    app.workspace.set_flashcard_topic(topic)?;
    run_show(app, false, format, use_color)
}

/// Move one card forward or back, staying put at either end
pub fn run_step(app: &mut App, forward: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    let moved = if forward {
        app.workspace.next_flashcard()?
    } else {
        app.workspace.prev_flashcard()?
    };

    if !moved {
        if let OutputFormat::Plain = format {
            let edge = if forward { "last" } else { "first" };
            println!("Already at the {} card.\n", edge);
        }
    }
    run_show(app, false, format, use_color)
}

pub fn run_mark(app: &mut App, mark: MarkArg, format: &OutputFormat) -> Result<()> {
    let mark = match mark {
        MarkArg::Known => CardMark::Known,
        MarkArg::Review => CardMark::Review,
    };
    let card_id = app.workspace.mark_card(mark)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "id": card_id, "mark": mark }))?);
        }
        OutputFormat::Plain => {
            let label = match mark {
                CardMark::Known => "known",
                CardMark::Review => "to review",
            };
            println!("Marked card {} as {}", card_id, label);
        }
    }

    Ok(())
}
