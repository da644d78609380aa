use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, progress_bar, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let (_, subject) = app.subject()?;
    let stats = app.workspace.stats()?;
    let history = app.workspace.history()?;

    match format {
        OutputFormat::Json => {
            let newest_first: Vec<_> = history.iter().rev().collect();
            let output = serde_json::json!({
                "subject": subject.name,
                "stats": stats,
                "history": newest_first,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&subject.name, Color::BOLD, use_color));
            println!(
                "  {} answered, {} correct, accuracy {}%",
                stats.answered, stats.correct, stats.accuracy
            );

            if !stats.topics.is_empty() {
                println!();
                let width = stats.topics.iter().map(|t| t.name.len()).max().unwrap_or(5).max(5);
                for topic in &stats.topics {
                    println!(
                        "  {:<width$} {} ({}/{})",
                        topic.name,
                        progress_bar(topic.stats.accuracy, 10),
                        topic.stats.correct,
                        topic.stats.answered,
                        width = width
                    );
                }
            }

            if !history.is_empty() {
                println!("\n{}", paint("Sessions", Color::BOLD, use_color));
                for summary in history.iter().rev() {
                    println!(
                        "  {}  {}/{} correct  {}%",
                        summary.date, summary.correct_answers, summary.questions_answered, summary.accuracy
                    );
                }
            }
        }
    }

    Ok(())
}
