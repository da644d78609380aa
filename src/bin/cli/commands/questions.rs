use anyhow::{bail, Result};

use examprep_lib::catalog::{parse_keywords, NewQuestion, Question, QuestionBody, Solution};
use examprep_lib::engine::ContentKind;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

/// Multiple-choice body from CLI options; `correct` counts from 1
pub fn choice_body(options: Vec<String>, correct: usize) -> Result<QuestionBody> {
    if correct == 0 {
        bail!("--correct counts from 1");
    }
    Ok(QuestionBody::MultipleChoice {
        options: options.into_iter().map(|o| o.trim().to_string()).collect(),
        correct_index: correct - 1,
    })
}

pub fn short_body(keywords: &str) -> QuestionBody {
    QuestionBody::ShortAnswer {
        keywords: parse_keywords(keywords),
    }
}

pub fn practice_body(solution: &str) -> QuestionBody {
    QuestionBody::Practice {
        solution: Solution::from_text(solution),
    }
}

fn print_saved(verb: &str, question: &Question, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": question.id,
                "type": question.kind(),
                "topic": question.topic,
                "question": question.text,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} {} question {}", verb, question.kind(), question.id);
            println!("  Topic: {}", question.topic);
        }
    }
    Ok(())
}

pub fn run_add(
    app: &mut App,
    topic: String,
    text: String,
    explanation: String,
    body: QuestionBody,
    format: &OutputFormat,
) -> Result<()> {
    let topic = app.resolve_topic(&topic)?;
    let question = app.workspace.add_question(NewQuestion {
        topic,
        text,
        explanation,
        body,
    })?;
    print_saved("Added", &question, format)
}

/// Edit input that keeps the body and whatever was not given
fn edited_question(
    existing: &Question,
    text: String,
    explanation: Option<String>,
    topic: Option<String>,
) -> NewQuestion {
    NewQuestion {
        topic: topic.unwrap_or_else(|| existing.topic.clone()),
        text,
        explanation: explanation.unwrap_or_else(|| existing.explanation.clone()),
        body: existing.body.clone(),
    }
}

pub fn run_edit_text(
    app: &mut App,
    id: u64,
    text: String,
    explanation: Option<String>,
    topic: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    let topic = topic.map(|t| app.resolve_topic(&t)).transpose()?;
    let existing = app.find_question(id)?;
    let input = edited_question(existing, text, explanation, topic);

    let question = app.workspace.update_question(id, input)?;
    print_saved("Updated", &question, format)
}

pub fn run_remove(app: &mut App, id: u64, format: &OutputFormat) -> Result<()> {
    let question = app.workspace.delete_question(id)?;
    print_saved("Deleted", &question, format)
}

pub fn run_list(
    app: &App,
    topic: Option<&str>,
    search: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let topic = topic.map(|t| app.resolve_topic(t)).transpose()?;
    let items = app.workspace.list_content(ContentKind::Questions, topic.as_deref(), search)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No questions found.");
                return Ok(());
            }

            let (_, subject) = app.subject()?;
            let mut last_topic: Option<&str> = None;
            for item in &items {
                if last_topic != Some(item.topic.as_str()) {
                    println!("{}", paint(subject.topic_name(&item.topic), Color::BOLD, use_color));
                    last_topic = Some(item.topic.as_str());
                }
                let kind = item.question_type.map(|k| k.to_string()).unwrap_or_default();
                println!(
                    "  {:>14} {:<16} {}",
                    item.id,
                    paint(&kind, Color::DIM, use_color),
                    item.text
                );
            }
            println!("\n{} questions", items.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Question {
        Question {
            id: 7,
            topic: "interrupts".to_string(),
            text: "What raises an IRQ?".to_string(),
            explanation: "Devices signal the CPU.".to_string(),
            body: QuestionBody::true_false(true),
        }
    }

    #[test]
    fn test_edit_moves_topic_and_keeps_body() {
        let input = edited_question(
            &existing(),
            "Who raises an IRQ?".to_string(),
            None,
            Some("dma".to_string()),
        );
        assert_eq!(input.topic, "dma");
        assert_eq!(input.text, "Who raises an IRQ?");
        assert_eq!(input.explanation, "Devices signal the CPU.");
        assert_eq!(input.body, QuestionBody::true_false(true));
    }

    #[test]
    fn test_edit_without_topic_keeps_it() {
        let input = edited_question(
            &existing(),
            "What raises an IRQ?".to_string(),
            Some("A device asserts a line.".to_string()),
            None,
        );
        assert_eq!(input.topic, "interrupts");
        assert_eq!(input.explanation, "A device asserts a line.");
    }
}
