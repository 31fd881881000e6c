use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use vitakita_core::models::answer::{AnswerOption, AnswerSet};
use vitakita_core::models::condition::{ConditionLabel, ConditionTotals, zeroed_totals};

use crate::error::InstrumentError;

/// A single questionnaire item and how strongly it bears on each condition.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    /// Absent conditions weigh 0.
    pub weights: BTreeMap<ConditionLabel, u32>,
}

impl Question {
    pub fn weight(&self, condition: ConditionLabel) -> u32 {
        self.weights.get(&condition).copied().unwrap_or(0)
    }
}

/// The two-week frequency scale: "Not at all" (0) … "Nearly every day" (3).
pub fn frequency_options() -> &'static [AnswerOption] {
    static OPTIONS: std::sync::LazyLock<Vec<AnswerOption>> = std::sync::LazyLock::new(|| {
        vec![
            AnswerOption::new("0", "Not at all", 0),
            AnswerOption::new("1", "Several days", 1),
            AnswerOption::new("2", "More than half the days", 2),
            AnswerOption::new("3", "Nearly every day", 3),
        ]
    });
    &OPTIONS
}

/// True only when every question has an entry in `answers`.
pub fn all_answered(answers: &AnswerSet, questions: &[Question]) -> bool {
    questions.iter().all(|q| answers.contains(&q.id))
}

/// Question ids with no entry in `answers`, in bank order.
pub fn missing_answers(answers: &AnswerSet, questions: &[Question]) -> Vec<String> {
    questions
        .iter()
        .filter(|q| !answers.contains(&q.id))
        .map(|q| q.id.clone())
        .collect()
}

/// Reject answer sets that reference unknown questions, skip a question,
/// or pick an option outside the scale.
pub fn validate_answers(
    questions: &[Question],
    options: &[AnswerOption],
    answers: &AnswerSet,
) -> Result<(), InstrumentError> {
    if questions.is_empty() {
        return Err(InstrumentError::EmptyBank);
    }

    if let Some((question_id, _)) = answers
        .iter()
        .find(|(id, _)| !questions.iter().any(|q| q.id == *id))
    {
        return Err(InstrumentError::UnknownQuestion {
            question_id: question_id.to_string(),
        });
    }

    let missing = missing_answers(answers, questions);
    if !missing.is_empty() {
        return Err(InstrumentError::IncompleteAnswers { missing });
    }

    for (question_id, option_id) in answers.iter() {
        if AnswerOption::by_id(options, option_id).is_none() {
            return Err(InstrumentError::UnknownOption {
                question_id: question_id.to_string(),
                option_id: option_id.to_string(),
            });
        }
    }

    Ok(())
}

/// Sum `weight × multiplier` per condition over a validated answer set.
/// Totals saturate at `u32::MAX` rather than overflow.
pub fn condition_totals(
    questions: &[Question],
    options: &[AnswerOption],
    answers: &AnswerSet,
) -> Result<ConditionTotals, InstrumentError> {
    validate_answers(questions, options, answers)?;

    let mut totals = zeroed_totals();
    for question in questions {
        let multiplier = answers
            .get(&question.id)
            .and_then(|id| AnswerOption::by_id(options, id))
            .map(|o| o.multiplier)
            .unwrap_or(0);

        for (condition, weight) in &question.weights {
            let total = totals.entry(*condition).or_insert(0);
            *total = total.saturating_add(weight.saturating_mul(multiplier));
        }
    }
    Ok(totals)
}

/// The condition with the strictly greatest total. Ties keep the earliest
/// label in `ConditionLabel::ALL` order, so an all-zero set is Depression.
pub fn winning_condition(totals: &ConditionTotals) -> ConditionLabel {
    let total = |c: &ConditionLabel| totals.get(c).copied().unwrap_or(0);

    let mut best = ConditionLabel::ALL[0];
    for condition in &ConditionLabel::ALL[1..] {
        if total(condition) > total(&best) {
            best = *condition;
        }
    }
    best
}

/// Score a completed answer set on the standard frequency scale.
pub fn score(
    questions: &[Question],
    answers: &AnswerSet,
) -> Result<ConditionLabel, InstrumentError> {
    score_with(questions, frequency_options(), answers)
}

/// Score a completed answer set against an explicit option scale.
pub fn score_with(
    questions: &[Question],
    options: &[AnswerOption],
    answers: &AnswerSet,
) -> Result<ConditionLabel, InstrumentError> {
    let totals = condition_totals(questions, options, answers)?;
    Ok(winning_condition(&totals))
}
