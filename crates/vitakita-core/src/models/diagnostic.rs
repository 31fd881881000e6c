use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::AnswerSet;
use super::condition::{ConditionLabel, ConditionTotals};

/// The outcome of scoring one completed questionnaire attempt.
///
/// `computed_at` is stamped when the attempt is submitted, not when it is
/// persisted, so stores can order results by submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosticResult {
    pub bank_id: String,
    pub label: ConditionLabel,
    pub totals: ConditionTotals,
    pub answers: AnswerSet,
    pub computed_at: jiff::Timestamp,
}

/// Per-user gate for whether the questionnaire must be (re)taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserDiagnosticState {
    pub requires_diagnostic: bool,
    pub last_result: Option<ConditionLabel>,
}

impl Default for UserDiagnosticState {
    fn default() -> Self {
        Self {
            requires_diagnostic: true,
            last_result: None,
        }
    }
}

impl UserDiagnosticState {
    /// State after `label` has been successfully saved.
    pub fn completed(label: ConditionLabel) -> Self {
        Self {
            requires_diagnostic: false,
            last_result: Some(label),
        }
    }
}
