use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use vitakita_core::models::answer::{AnswerOption, AnswerSet};
use vitakita_core::models::condition::ConditionLabel;
use vitakita_core::models::diagnostic::{DiagnosticResult, UserDiagnosticState};
use vitakita_core::models::profile::MergeOutcome;
use vitakita_instruments::QuestionBank;
use vitakita_instruments::scoring::{self, Question};
use vitakita_storage::error::StorageError;
use vitakita_storage::port::ProfileStore;

use crate::config::SessionConfig;
use crate::error::DiagnosticError;

/// Where a user is in the questionnaire lifecycle. There is no terminal
/// phase; `Completed` rests until the user asks to retake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NeedsDiagnostic,
    InProgress,
    Submitting,
    Completed,
    Error,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionPhase::NeedsDiagnostic => "needs diagnostic",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Submitting => "submitting",
            SessionPhase::Completed => "completed",
            SessionPhase::Error => "in error",
        })
    }
}

/// A scored attempt on its way to the store.
///
/// Returned by [`DiagnosticSession::begin_submit`]; the outcome of
/// [`PendingSubmission::write`] goes back through
/// [`DiagnosticSession::finish_submit`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    submission: u64,
    user_id: String,
    result: DiagnosticResult,
    state: UserDiagnosticState,
}

impl PendingSubmission {
    pub fn submission(&self) -> u64 {
        self.submission
    }

    pub fn result(&self) -> &DiagnosticResult {
        &self.result
    }

    /// Save the result, bounded by `timeout`.
    pub async fn write(
        &self,
        store: &dyn ProfileStore,
        timeout: Duration,
    ) -> Result<MergeOutcome, DiagnosticError> {
        let save = store.save_diagnostic_result(&self.user_id, &self.result, &self.state);
        match tokio::time::timeout(timeout, save).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(e)) => Err(DiagnosticError::PersistenceWrite(e)),
            Err(_) => Err(DiagnosticError::WriteTimedOut { after: timeout }),
        }
    }
}

/// One user's diagnostic questionnaire, driven by discrete UI events.
pub struct DiagnosticSession {
    store: Arc<dyn ProfileStore>,
    bank: Arc<dyn QuestionBank>,
    user_id: String,
    config: SessionConfig,
    phase: SessionPhase,
    answers: AnswerSet,
    last_result: Option<ConditionLabel>,
    result: Option<DiagnosticResult>,
    /// Scored attempt not yet saved. Survives write failures so a retry
    /// resubmits the same attempt.
    pending: Option<DiagnosticResult>,
    last_error: Option<String>,
    next_submission: u64,
    in_flight: Option<u64>,
}

impl DiagnosticSession {
    /// Load the user's state and start a session. A user with no profile
    /// document starts in `NeedsDiagnostic`.
    pub async fn open(
        store: Arc<dyn ProfileStore>,
        bank: Arc<dyn QuestionBank>,
        user_id: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self, DiagnosticError> {
        let user_id = user_id.into();
        let state = match store.load_user_diagnostic_state(&user_id).await {
            Ok(state) => state,
            Err(StorageError::NotFound { .. }) => {
                debug!(user_id = %user_id, "no profile yet, starting fresh");
                UserDiagnosticState::default()
            }
            Err(e) => return Err(DiagnosticError::Load(e)),
        };
        Ok(Self::with_state(store, bank, user_id, state, config))
    }

    /// Start a session from state the caller already holds.
    pub fn with_state(
        store: Arc<dyn ProfileStore>,
        bank: Arc<dyn QuestionBank>,
        user_id: impl Into<String>,
        state: UserDiagnosticState,
        config: SessionConfig,
    ) -> Self {
        let phase = if state.requires_diagnostic || state.last_result.is_none() {
            SessionPhase::NeedsDiagnostic
        } else {
            SessionPhase::Completed
        };
        let user_id = user_id.into();
        info!(user_id = %user_id, bank = bank.id(), phase = %phase, "diagnostic session opened");

        Self {
            store,
            bank,
            user_id,
            config,
            phase,
            answers: AnswerSet::new(),
            last_result: state.last_result,
            result: None,
            pending: None,
            last_error: None,
            next_submission: 1,
            in_flight: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn bank(&self) -> &dyn QuestionBank {
        self.bank.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        self.bank.questions()
    }

    pub fn options(&self) -> &[AnswerOption] {
        self.bank.options()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn all_answered(&self) -> bool {
        scoring::all_answered(&self.answers, self.bank.questions())
    }

    /// (answered, total) for progress display.
    pub fn progress(&self) -> (usize, usize) {
        let questions = self.bank.questions();
        let answered = questions
            .iter()
            .filter(|q| self.answers.contains(&q.id))
            .count();
        (answered, questions.len())
    }

    /// Label from the last successful save, kept for display through retakes.
    pub fn last_result(&self) -> Option<ConditionLabel> {
        self.last_result
    }

    /// Full result saved during this session, if any.
    pub fn result(&self) -> Option<&DiagnosticResult> {
        self.result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn diagnostic_state(&self) -> UserDiagnosticState {
        UserDiagnosticState {
            requires_diagnostic: self.phase != SessionPhase::Completed,
            last_result: self.last_result,
        }
    }

    /// The questionnaire was opened. `NeedsDiagnostic → InProgress`.
    pub fn start(&mut self) -> Result<(), DiagnosticError> {
        self.expect_phase(SessionPhase::NeedsDiagnostic, "start")?;
        self.transition(SessionPhase::InProgress);
        Ok(())
    }

    /// Record or replace the answer to one question.
    pub fn select_answer(
        &mut self,
        question_id: &str,
        option_id: &str,
    ) -> Result<(), DiagnosticError> {
        self.expect_phase(SessionPhase::InProgress, "select an answer")?;
        self.bank.validate_selection(question_id, option_id)?;
        self.answers.select(question_id, option_id);
        Ok(())
    }

    /// Close the questionnaire without submitting, back to the last result if
    /// there is one. Answers are kept so that reopening resumes where the user
    /// left off.
    pub fn cancel(&mut self) -> Result<(), DiagnosticError> {
        self.expect_phase(SessionPhase::InProgress, "cancel")?;
        let next = if self.last_result.is_some() {
            SessionPhase::Completed
        } else {
            SessionPhase::NeedsDiagnostic
        };
        self.transition(next);
        Ok(())
    }

    /// Validate and score the answers, then move to `Submitting`.
    ///
    /// Allowed from `InProgress` and, as a retry of the same attempt, from
    /// `Error`. Incomplete or invalid answers are rejected without changing
    /// phase.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, DiagnosticError> {
        let result = match self.phase {
            SessionPhase::Submitting => return Err(DiagnosticError::AlreadySubmitting),
            SessionPhase::InProgress => self.score_answers()?,
            SessionPhase::Error => match &self.pending {
                Some(result) => result.clone(),
                None => self.score_answers()?,
            },
            from => {
                return Err(DiagnosticError::InvalidTransition {
                    from,
                    event: "submit",
                });
            }
        };

        let submission = self.next_submission;
        self.next_submission += 1;
        self.in_flight = Some(submission);
        self.pending = Some(result.clone());
        self.transition(SessionPhase::Submitting);

        info!(
            user_id = %self.user_id,
            submission,
            label = %result.label,
            "submitting diagnostic result"
        );

        Ok(PendingSubmission {
            submission,
            user_id: self.user_id.clone(),
            state: UserDiagnosticState::completed(result.label),
            result,
        })
    }

    /// Apply the outcome of a write started by [`Self::begin_submit`].
    ///
    /// Outcomes for a submission that is no longer in flight are discarded
    /// with [`DiagnosticError::Superseded`]. If the store kept a newer result
    /// instead of this one, the session moves to `Error` with
    /// [`DiagnosticError::NewerResultStored`] and the answers are kept.
    pub fn finish_submit(
        &mut self,
        pending: PendingSubmission,
        outcome: Result<MergeOutcome, DiagnosticError>,
    ) -> Result<DiagnosticResult, DiagnosticError> {
        if self.in_flight != Some(pending.submission) {
            warn!(
                user_id = %self.user_id,
                submission = pending.submission,
                "discarding outcome of superseded submission"
            );
            return Err(DiagnosticError::Superseded {
                submission: pending.submission,
            });
        }
        self.in_flight = None;

        let outcome = match outcome {
            Ok(MergeOutcome::Superseded { current }) => {
                // Nothing was written; a retry rescores with a fresh stamp.
                self.last_result = Some(current);
                self.pending = None;
                Err(DiagnosticError::NewerResultStored { stored: current })
            }
            other => other,
        };

        match outcome {
            Ok(merge) => {
                if merge == MergeOutcome::AlreadyApplied {
                    debug!(user_id = %self.user_id, "result was already stored");
                }
                info!(
                    user_id = %self.user_id,
                    label = %pending.result.label,
                    "diagnostic result saved"
                );
                self.last_result = Some(pending.result.label);
                self.result = Some(pending.result.clone());
                self.pending = None;
                self.last_error = None;
                self.transition(SessionPhase::Completed);
                Ok(pending.result)
            }
            Err(e) => {
                warn!(
                    user_id = %self.user_id,
                    error = %e,
                    answered = self.answers.len(),
                    "diagnostic save failed, answers kept for retry"
                );
                self.last_error = Some(e.to_string());
                self.transition(SessionPhase::Error);
                Err(e)
            }
        }
    }

    /// Score, save and apply in one step.
    pub async fn submit(&mut self) -> Result<DiagnosticResult, DiagnosticError> {
        let pending = self.begin_submit()?;
        let store = Arc::clone(&self.store);
        let outcome = pending.write(store.as_ref(), self.config.write_timeout).await;
        self.finish_submit(pending, outcome)
    }

    /// Resubmit after a failed write. `Error → Submitting`.
    pub async fn retry(&mut self) -> Result<DiagnosticResult, DiagnosticError> {
        self.expect_phase(SessionPhase::Error, "retry")?;
        self.submit().await
    }

    /// Give up waiting on the in-flight write (e.g. the user navigated away
    /// and the future was dropped). Its outcome, if it ever arrives, is
    /// discarded; the attempt stays available for retry.
    pub fn abandon_submission(&mut self) -> Result<(), DiagnosticError> {
        self.expect_phase(SessionPhase::Submitting, "abandon a submission")?;
        self.in_flight = None;
        self.last_error = Some("submission abandoned before it completed".to_string());
        self.transition(SessionPhase::Error);
        Ok(())
    }

    /// Start over. `Completed → NeedsDiagnostic`, clearing the answers. The
    /// previous result stays in the store until a new one is saved.
    pub fn retake(&mut self) -> Result<(), DiagnosticError> {
        self.expect_phase(SessionPhase::Completed, "retake")?;
        self.answers.clear();
        self.pending = None;
        self.transition(SessionPhase::NeedsDiagnostic);
        Ok(())
    }

    fn score_answers(&self) -> Result<DiagnosticResult, DiagnosticError> {
        let totals = self.bank.condition_totals(&self.answers)?;
        let label = scoring::winning_condition(&totals);
        Ok(DiagnosticResult {
            bank_id: self.bank.id().to_string(),
            label,
            totals,
            answers: self.answers.clone(),
            computed_at: jiff::Timestamp::now(),
        })
    }

    fn expect_phase(
        &self,
        expected: SessionPhase,
        event: &'static str,
    ) -> Result<(), DiagnosticError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DiagnosticError::InvalidTransition {
                from: self.phase,
                event,
            })
        }
    }

    fn transition(&mut self, to: SessionPhase) {
        debug!(user_id = %self.user_id, from = %self.phase, to = %to, "diagnostic phase change");
        self.phase = to;
    }
}
