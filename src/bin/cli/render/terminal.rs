use examprep_lib::catalog::{Flashcard, Question, QuestionBody, Solution, Subject};
use examprep_lib::engine::Grade;
use examprep_lib::session::CardMark;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color when colors are on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// `[#####-----] 50%`
pub fn progress_bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width) / 100;
    format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(width - filled), percent)
}

/// Render a question as the quiz shows it
pub fn render_question(question: &Question, subject: &Subject, position: usize, total: usize, use_color: bool) -> String {
    let mut lines = Vec::new();
    let header = format!(
        "Question {}/{}  {}  {}",
        position + 1,
        total,
        question.kind(),
        subject.topic_name(&question.topic)
    );
    lines.push(paint(&header, Color::DIM, use_color));
    lines.push(String::new());
    lines.extend(wrap_lines(&question.text, "", 80));

    match &question.body {
        QuestionBody::MultipleChoice { options, .. } | QuestionBody::TrueFalse { options, .. } => {
            lines.push(String::new());
            for (i, option) in options.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, option));
            }
        }
        QuestionBody::ShortAnswer { .. } => {
            lines.push(String::new());
            lines.push(paint("Answer in a few words.", Color::GRAY, use_color));
        }
        QuestionBody::Practice { .. } => {
            lines.push(String::new());
            lines.push(paint("Write your solution, then compare.", Color::GRAY, use_color));
        }
    }

    lines.join("\n")
}

/// Render the feedback for a graded answer
pub fn render_grade(grade: &Grade, use_color: bool) -> String {
    let mut lines = Vec::new();

    match &grade.solution {
        Some(solution) => {
            lines.push(paint("Solution:", Color::BOLD, use_color));
            lines.extend(render_solution(solution, use_color));
        }
        None if grade.is_correct => lines.push(paint("Correct!", Color::GREEN, use_color)),
        None => {
            lines.push(paint("Incorrect.", Color::RED, use_color));
            lines.push(format!("Expected: {}", grade.expected));
        }
    }

    if !grade.explanation.is_empty() {
        lines.push(String::new());
        lines.extend(wrap_lines(&grade.explanation, "", 80));
    }

    lines.join("\n")
}

fn render_solution(solution: &Solution, use_color: bool) -> Vec<String> {
    match solution {
        Solution::Code(code) => code
            .lines()
            .map(|line| paint(&format!("    {}", line), Color::CYAN, use_color))
            .collect(),
        Solution::Text(text) => wrap_lines(text, "  ", 80),
    }
}

/// Render one side or both sides of a flashcard
pub fn render_flashcard(
    card: &Flashcard,
    subject: &Subject,
    position: usize,
    total: usize,
    mark: Option<CardMark>,
    flip: bool,
    use_color: bool,
) -> String {
    let mut lines = Vec::new();
    let tag = match mark {
        Some(CardMark::Known) => paint("  [known]", Color::GREEN, use_color),
        Some(CardMark::Review) => paint("  [review]", Color::YELLOW, use_color),
        None => String::new(),
    };
    let header = format!("Card {}/{}  {}", position + 1, total, subject.topic_name(&card.topic));
    lines.push(format!("{}{}", paint(&header, Color::DIM, use_color), tag));
    lines.push(String::new());
    lines.extend(wrap_lines(&card.front, "", 80));

    if flip {
        lines.push(paint(&"\u{2500}".repeat(20), Color::GRAY, use_color));
        lines.extend(wrap_lines(&card.back, "", 80));
    }

    lines.join("\n")
}

/// Simple word-wrapping for terminal output
pub fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(format!("{}{}", prefix, current_line));
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(format!("{}{}", prefix, current_line));
        }
    }

    if lines.is_empty() && !text.is_empty() {
        lines.push(format!("{}{}", prefix, text));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_lines() {
        let lines = wrap_lines("one two three four", "> ", 11);
        assert_eq!(lines, vec!["> one two", "> three", "> four"]);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(50, 10), "[#####-----] 50%");
        assert_eq!(progress_bar(100, 4), "[####] 100%");
    }

    #[test]
    fn test_paint_without_color() {
        assert_eq!(paint("ok", Color::GREEN, false), "ok");
        assert_eq!(paint("ok", Color::GREEN, true), "\x1b[32mok\x1b[0m");
    }
}
