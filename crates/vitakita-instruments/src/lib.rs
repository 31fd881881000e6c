//! vitakita-instruments
//!
//! Self-report screening questionnaires. Pure data, no storage dependency.
//! Defines the questions, their per-condition weights, the shared answer
//! scale, and the scoring rules that turn a completed answer set into a
//! condition label.

pub mod banks;
pub mod error;
pub mod scoring;

use vitakita_core::models::answer::{AnswerOption, AnswerSet};
use vitakita_core::models::condition::{ConditionLabel, ConditionTotals};

use error::InstrumentError;
use scoring::Question;

/// Trait implemented by each screening questionnaire.
pub trait QuestionBank: Send + Sync {
    /// Unique identifier for this bank (e.g., "wellbeing_screen").
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// The questions, in presentation order. Stable for the process lifetime.
    fn questions(&self) -> &[Question];

    /// The answer scale shared by every question.
    fn options(&self) -> &[AnswerOption] {
        scoring::frequency_options()
    }

    fn question(&self, id: &str) -> Option<&Question> {
        self.questions().iter().find(|q| q.id == id)
    }

    fn option(&self, id: &str) -> Option<&AnswerOption> {
        AnswerOption::by_id(self.options(), id)
    }

    /// Check a single selection before it is recorded.
    fn validate_selection(
        &self,
        question_id: &str,
        option_id: &str,
    ) -> Result<(), InstrumentError> {
        if self.question(question_id).is_none() {
            return Err(InstrumentError::UnknownQuestion {
                question_id: question_id.to_string(),
            });
        }
        if self.option(option_id).is_none() {
            return Err(InstrumentError::UnknownOption {
                question_id: question_id.to_string(),
                option_id: option_id.to_string(),
            });
        }
        Ok(())
    }

    fn all_answered(&self, answers: &AnswerSet) -> bool {
        scoring::all_answered(answers, self.questions())
    }

    fn condition_totals(&self, answers: &AnswerSet) -> Result<ConditionTotals, InstrumentError> {
        scoring::condition_totals(self.questions(), self.options(), answers)
    }

    fn score(&self, answers: &AnswerSet) -> Result<ConditionLabel, InstrumentError> {
        scoring::score_with(self.questions(), self.options(), answers)
    }
}

/// Return all registered question banks.
pub fn all_banks() -> Vec<Box<dyn QuestionBank>> {
    vec![Box::new(banks::wellbeing_screen::WellbeingScreen)]
}

/// Look up a question bank by ID.
pub fn get_bank(id: &str) -> Option<Box<dyn QuestionBank>> {
    all_banks().into_iter().find(|b| b.id() == id)
}
