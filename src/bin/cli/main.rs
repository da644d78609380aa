mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use examprep_lib::catalog::QuestionType;

#[derive(Parser)]
#[command(name = "examprep-cli", about = "Exam preparation quizzes and flashcards", version)]
struct Cli {
    /// Use a specific data directory (default: EXAM_PREP_DATA_DIR or the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Manage subjects
    #[command(subcommand)]
    Subjects(SubjectsCommand),

    /// Manage topics of the current subject
    #[command(subcommand)]
    Topics(TopicsCommand),

    /// Author questions in the current subject
    #[command(subcommand)]
    Questions(QuestionsCommand),

    /// Author flashcards in the current subject
    #[command(subcommand)]
    Flashcards(FlashcardsCommand),

    /// Take the quiz
    #[command(subcommand)]
    Quiz(QuizCommand),

    /// Study flashcards
    #[command(subcommand)]
    Cards(CardsCommand),

    /// Show progress for the current subject
    Stats,

    /// Merge subjects from a JSON export
    Import {
        /// Path to the JSON document
        file: PathBuf,
    },

    /// Write the whole catalog to a date-stamped JSON file
    Export {
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SubjectsCommand {
    /// List subjects
    List,
    /// Create a subject and switch to it
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a subject and everything recorded for it
    Remove { id: String },
    /// Switch the current subject
    Use { id: String },
}

#[derive(Subcommand)]
enum TopicsCommand {
    /// List topics with their item counts
    List,
    /// Create a topic
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete an unused topic
    Remove { id: String },
}

#[derive(Subcommand)]
enum QuestionsCommand {
    /// Add a multiple-choice question
    AddChoice {
        text: String,
        #[arg(long)]
        topic: String,
        /// Answer option, repeat for each option
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        /// Number of the correct option, starting at 1
        #[arg(long)]
        correct: usize,
        /// Shown after the question is answered
        #[arg(long)]
        explanation: String,
    },
    /// Add a true/false question
    AddTrueFalse {
        text: String,
        #[arg(long)]
        topic: String,
        /// Whether the statement is true
        #[arg(long, action = clap::ArgAction::Set)]
        answer: bool,
        /// Shown after the question is answered
        #[arg(long)]
        explanation: String,
    },
    /// Add a short-answer question
    AddShort {
        text: String,
        #[arg(long)]
        topic: String,
        /// Comma-separated accepted keywords
        #[arg(long)]
        keywords: String,
        /// Shown after the question is answered
        #[arg(long)]
        explanation: String,
    },
    /// Add a practice question
    AddPractice {
        text: String,
        #[arg(long)]
        topic: String,
        /// Solution text or code (use "-" to read from stdin)
        #[arg(long)]
        solution: String,
        /// Shown after the question is answered
        #[arg(long)]
        explanation: String,
    },
    /// Change the text, explanation or topic of a question
    EditText {
        id: u64,
        text: String,
        #[arg(long)]
        explanation: Option<String>,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Delete a question
    Remove { id: u64 },
    /// List questions sorted by topic
    List {
        #[arg(long)]
        topic: Option<String>,
        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum FlashcardsCommand {
    /// Add a flashcard
    Add {
        front: String,
        back: String,
        #[arg(long)]
        topic: String,
    },
    /// Edit a flashcard
    Edit {
        id: u64,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Delete a flashcard
    Remove { id: u64 },
    /// List flashcards sorted by topic
    List {
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum QuizCommand {
    /// Show the current question
    Show,
    /// Restrict the quiz to a question type and/or topic; starts a new run
    Filter {
        /// multiple-choice, true-false, short-answer or practice
        #[arg(long = "type")]
        kind: Option<QuestionType>,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Answer the current question (option number, true/false, or text)
    Answer { answer: String },
    /// Move to the next question
    Next,
    /// Start a new run from the first question
    Restart,
}

#[derive(Subcommand)]
enum CardsCommand {
    /// Show the current flashcard
    Show {
        /// Also show the back side
        #[arg(long)]
        flip: bool,
    },
    /// Restrict the deck to a topic
    Filter {
        #[arg(long)]
        topic: Option<String>,
    },
    /// Go to the next card
    Next,
    /// Go to the previous card
    Prev,
    /// Mark the current card
    Mark { mark: MarkArg },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MarkArg {
    Known,
    Review,
}

/// Resolve "-" as stdin
fn resolve_content(content: String) -> String {
    if content == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf).ok();
        buf
    } else {
        content
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let format = &cli.format;
    let mut app = app::App::new(cli.data_dir)?;

    match cli.command {
        Command::Subjects(subcmd) => match subcmd {
            SubjectsCommand::List => commands::subjects::run_list(&app, format, use_color)?,
            SubjectsCommand::Add { name, description } => {
                commands::subjects::run_add(&mut app, &name, &description, format)?
            }
            SubjectsCommand::Remove { id } => commands::subjects::run_remove(&mut app, &id, format)?,
            SubjectsCommand::Use { id } => commands::subjects::run_use(&mut app, &id, format)?,
        },
        Command::Topics(subcmd) => match subcmd {
            TopicsCommand::List => commands::topics::run_list(&app, format, use_color)?,
            TopicsCommand::Add { name, description } => {
                commands::topics::run_add(&mut app, &name, &description, format)?
            }
            TopicsCommand::Remove { id } => commands::topics::run_remove(&mut app, &id, format)?,
        },
        Command::Questions(subcmd) => match subcmd {
            QuestionsCommand::AddChoice { text, topic, options, correct, explanation } => {
                let body = commands::questions::choice_body(options, correct)?;
                commands::questions::run_add(&mut app, topic, text, explanation, body, format)?
            }
            QuestionsCommand::AddTrueFalse { text, topic, answer, explanation } => {
                let body = examprep_lib::catalog::QuestionBody::true_false(answer);
                commands::questions::run_add(&mut app, topic, text, explanation, body, format)?
            }
            QuestionsCommand::AddShort { text, topic, keywords, explanation } => {
                let body = commands::questions::short_body(&keywords);
                commands::questions::run_add(&mut app, topic, text, explanation, body, format)?
            }
            QuestionsCommand::AddPractice { text, topic, solution, explanation } => {
                let body = commands::questions::practice_body(&resolve_content(solution));
                commands::questions::run_add(&mut app, topic, text, explanation, body, format)?
            }
            QuestionsCommand::EditText { id, text, explanation, topic } => {
                commands::questions::run_edit_text(&mut app, id, text, explanation, topic, format)?
            }
            QuestionsCommand::Remove { id } => commands::questions::run_remove(&mut app, id, format)?,
            QuestionsCommand::List { topic, search } => {
                commands::questions::run_list(&app, topic.as_deref(), search.as_deref(), format, use_color)?
            }
        },
        Command::Flashcards(subcmd) => match subcmd {
            FlashcardsCommand::Add { front, back, topic } => {
                commands::flashcards::run_add(&mut app, topic, front, back, format)?
            }
            FlashcardsCommand::Edit { id, front, back, topic } => {
                commands::flashcards::run_edit(&mut app, id, front, back, topic, format)?
            }
            FlashcardsCommand::Remove { id } => commands::flashcards::run_remove(&mut app, id, format)?,
            FlashcardsCommand::List { topic, search } => {
                commands::flashcards::run_list(&app, topic.as_deref(), search.as_deref(), format, use_color)?
            }
        },
        Command::Quiz(subcmd) => match subcmd {
            QuizCommand::Show => commands::quiz::run_show(&app, format, use_color)?,
            QuizCommand::Filter { kind, topic } => {
                commands::quiz::run_filter(&mut app, kind, topic, format, use_color)?
            }
            QuizCommand::Answer { answer } => commands::quiz::run_answer(&mut app, &answer, format, use_color)?,
            QuizCommand::Next => commands::quiz::run_next(&mut app, format, use_color)?,
            QuizCommand::Restart => commands::quiz::run_restart(&mut app, format, use_color)?,
        },
        Command::Cards(subcmd) => match subcmd {
            CardsCommand::Show { flip } => commands::cards::run_show(&app, flip, format, use_color)?,
            CardsCommand::Filter { topic } => commands::cards::run_filter(&mut app, topic, format, use_color)?,
            CardsCommand::Next => commands::cards::run_step(&mut app, true, format, use_color)?,
            CardsCommand::Prev => commands::cards::run_step(&mut app, false, format, use_color)?,
            CardsCommand::Mark { mark } => commands::cards::run_mark(&mut app, mark, format)?,
        },
        Command::Stats => commands::stats::run(&app, format, use_color)?,
        Command::Import { file } => commands::transfer::run_import(&mut app, &file, format)?,
        Command::Export { out } => commands::transfer::run_export(&app, out, format)?,
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
