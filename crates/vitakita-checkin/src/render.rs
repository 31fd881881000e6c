//! Plain-text rendering of the questionnaire for the terminal.

use std::fmt::Write;

use vitakita_core::models::answer::AnswerOption;
use vitakita_core::models::condition::ConditionLabel;
use vitakita_core::models::diagnostic::DiagnosticResult;
use vitakita_instruments::scoring::Question;

pub const INTRO: &str = "Answer a few questions to help tailor your experience. \
You can retake this anytime. Type 'q' to stop for now.";

/// One question with its numbered options.
pub fn question_block(
    index: usize,
    total: usize,
    question: &Question,
    options: &[AnswerOption],
) -> String {
    let mut out = format!("\nQuestion {} of {}\n{}\n", index + 1, total, question.prompt);
    for option in options {
        let _ = writeln!(out, "  [{}] {}", option.id, option.label);
    }
    out
}

/// Match user input against an option id or label (case-insensitive).
pub fn parse_choice<'a>(input: &str, options: &'a [AnswerOption]) -> Option<&'a AnswerOption> {
    let input = input.trim();
    options
        .iter()
        .find(|o| o.id == input || o.label.eq_ignore_ascii_case(input))
}

pub fn result_summary(result: &DiagnosticResult) -> String {
    let mut out = format!("Latest diagnostic result: {}\n", result.label);
    for condition in ConditionLabel::ALL {
        let total = result.totals.get(&condition).copied().unwrap_or(0);
        let _ = writeln!(out, "  {condition:<10} {total}");
    }
    out
}

pub fn last_result_line(label: Option<ConditionLabel>) -> String {
    match label {
        Some(label) => format!("Latest diagnostic result: {label}"),
        None => "No diagnostic result yet.".to_string(),
    }
}

/// `y`/`yes` → true, `n`/`no` → false, empty → `default`.
pub fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}
