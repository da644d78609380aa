use anyhow::{bail, Result};

use examprep_lib::catalog::{Question, QuestionBody, QuestionType};
use examprep_lib::engine::Answer;
use examprep_lib::session::Advance;

use crate::app::App;
use crate::render::terminal::{self, paint, Color};
use crate::OutputFormat;

/// Turn typed input into an answer for the given question
fn parse_answer(question: &Question, input: &str) -> Result<Answer> {
    let input = input.trim();
    match &question.body {
        QuestionBody::MultipleChoice { options, .. } | QuestionBody::TrueFalse { options, .. } => {
            if let Some(index) = options.iter().position(|o| o.eq_ignore_ascii_case(input)) {
                return Ok(Answer::Choice(index));
            }
            match input.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Answer::Choice(n - 1)),
                _ => bail!("Answer with an option number between 1 and {}", options.len()),
            }
        }
        QuestionBody::ShortAnswer { .. } | QuestionBody::Practice { .. } => Ok(Answer::Text(input.to_string())),
    }
}

fn question_json(app: &App) -> Result<serde_json::Value> {
    let questions = app.workspace.filtered_questions()?;
    let state = app.workspace.state();
    let current = app.workspace.current_question()?;

    Ok(serde_json::json!({
        "index": state.quiz.current_index,
        "total": questions.len(),
        "progress": app.workspace.run_progress()?,
        "finished": state.quiz.finished,
        "question": current.map(|q| serde_json::json!({
            "id": q.id,
            "type": q.kind(),
            "topic": q.topic,
            "question": q.text,
            "options": q.body.options(),
            "answered": state.is_answered_in_run(q.id),
        })),
    }))
}

pub fn run_show(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&question_json(app)?)?);
        return Ok(());
    }

    let (_, subject) = app.subject()?;
    let state = app.workspace.state();
    if state.quiz.finished {
        println!("This run is complete. Use `quiz restart` to go again.");
        return Ok(());
    }

    let questions = app.workspace.filtered_questions()?;
    let Some(question) = app.workspace.current_question()? else {
        println!("No questions match the current filters.");
        return Ok(());
    };

    println!(
        "{}\n",
        paint(&terminal::progress_bar(app.workspace.run_progress()?, 20), Color::DIM, use_color)
    );
    println!(
        "{}",
        terminal::render_question(question, subject, state.quiz.current_index, questions.len(), use_color)
    );
    if state.is_answered_in_run(question.id) {
        println!("\n{}", paint("Answered. Use `quiz next` to continue.", Color::GRAY, use_color));
    }

    Ok(())
}

pub fn run_filter(
    app: &mut App,
    kind: Option<QuestionType>,
    topic: Option<String>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let topic = topic.map(|t| app.resolve_topic(&t)).transpose()?;
    app.workspace.set_quiz_filter(kind, topic)?;
    run_show(app, format, use_color)
}

pub fn run_answer(app: &mut App, input: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let Some(question) = app.workspace.current_question()? else {
        bail!("No questions match the current filters");
    };
    let answer = parse_answer(question, input)?;
    let grade = app.workspace.submit_answer(&answer)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "isCorrect": grade.is_correct,
                "expected": grade.expected,
                "explanation": grade.explanation,
                "solution": grade.solution.as_ref().map(|s| s.as_str()),
                "progress": app.workspace.run_progress()?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::render_grade(&grade, use_color));
            println!(
                "\n{}",
                paint(&terminal::progress_bar(app.workspace.run_progress()?, 20), Color::DIM, use_color)
            );
        }
    }

    Ok(())
}

pub fn run_next(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    match app.workspace.next_question()? {
        Advance::Question(_) => run_show(app, format, use_color),
        Advance::Finished(summary) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Plain => {
                    println!("{}", paint("Quiz complete!", Color::BOLD, use_color));
                    println!(
                        "  {} of {} correct ({}%)",
                        summary.correct_answers, summary.questions_answered, summary.accuracy
                    );
                }
            }
            Ok(())
        }
    }
}

pub fn run_restart(app: &mut App, format: &OutputFormat, use_color: bool) -> Result<()> {
    app.workspace.restart_quiz()?;
    run_show(app, format, use_color)
}
