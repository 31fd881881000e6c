use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::condition::ConditionLabel;
use super::diagnostic::{DiagnosticResult, UserDiagnosticState};

/// The user profile document, keyed by uid.
///
/// `disease` and `requires_diagnostic` are overwritten by each newer result;
/// `assessments` is append-only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub uid: String,
    pub disease: Option<ConditionLabel>,
    #[serde(default = "default_requires_diagnostic")]
    pub requires_diagnostic: bool,
    #[serde(default)]
    pub assessments: Vec<DiagnosticResult>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

fn default_requires_diagnostic() -> bool {
    true
}

/// What a store did with a submitted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Applied,
    /// This exact result is already the profile's latest, e.g. a retried
    /// write whose first attempt landed.
    AlreadyApplied,
    /// The profile holds a different result submitted at or after this one.
    /// `current` is the label the profile keeps.
    Superseded { current: ConditionLabel },
}

impl MergeOutcome {
    /// True when the profile's latest result is the one that was submitted.
    pub fn is_stored(&self) -> bool {
        matches!(self, MergeOutcome::Applied | MergeOutcome::AlreadyApplied)
    }
}

impl UserProfile {
    pub fn new(uid: &str, now: jiff::Timestamp) -> Self {
        Self {
            uid: uid.to_string(),
            disease: None,
            requires_diagnostic: true,
            assessments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A profile with no recorded condition always needs the questionnaire,
    /// whatever its flag says.
    pub fn diagnostic_state(&self) -> UserDiagnosticState {
        UserDiagnosticState {
            requires_diagnostic: self.requires_diagnostic || self.disease.is_none(),
            last_result: self.disease,
        }
    }

    pub fn latest_result(&self) -> Option<&DiagnosticResult> {
        self.assessments.iter().max_by_key(|r| r.computed_at)
    }

    /// Merge a submitted result into the profile, last submission wins.
    pub fn apply_result(
        &mut self,
        result: &DiagnosticResult,
        state: &UserDiagnosticState,
        now: jiff::Timestamp,
    ) -> MergeOutcome {
        if let Some(latest) = self.latest_result() {
            if latest == result {
                return MergeOutcome::AlreadyApplied;
            }
            if latest.computed_at >= result.computed_at {
                return MergeOutcome::Superseded {
                    current: latest.label,
                };
            }
        }

        self.disease = Some(result.label);
        self.requires_diagnostic = state.requires_diagnostic;
        self.assessments.push(result.clone());
        self.updated_at = now;
        MergeOutcome::Applied
    }
}
