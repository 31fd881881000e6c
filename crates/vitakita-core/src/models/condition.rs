use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The closed set of conditions the screening questionnaire discriminates
/// between. Declaration order is the tie-break order used by the scorer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub enum ConditionLabel {
    Depression,
    Anxiety,
    Stress,
}

impl ConditionLabel {
    /// Every label, in tie-break order.
    pub const ALL: [ConditionLabel; 3] = [
        ConditionLabel::Depression,
        ConditionLabel::Anxiety,
        ConditionLabel::Stress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionLabel::Depression => "Depression",
            ConditionLabel::Anxiety => "Anxiety",
            ConditionLabel::Stress => "Stress",
        }
    }
}

impl fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Running weighted totals per condition.
pub type ConditionTotals = BTreeMap<ConditionLabel, u32>;

/// A totals map with an explicit zero for every label.
pub fn zeroed_totals() -> ConditionTotals {
    ConditionLabel::ALL.iter().map(|c| (*c, 0)).collect()
}
