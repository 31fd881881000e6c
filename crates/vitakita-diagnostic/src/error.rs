use std::time::Duration;

use thiserror::Error;

use vitakita_core::models::condition::ConditionLabel;
use vitakita_instruments::error::InstrumentError;
use vitakita_storage::error::StorageError;

use crate::session::SessionPhase;

#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// Selection or scoring was rejected: incomplete answers, an unknown
    /// option or an unknown question.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    #[error("failed to load diagnostic state: {0}")]
    Load(#[source] StorageError),

    #[error("failed to save diagnostic result: {0}")]
    PersistenceWrite(#[source] StorageError),

    #[error("saving diagnostic result timed out after {after:?}")]
    WriteTimedOut { after: Duration },

    /// The store kept a newer result than this attempt; nothing was saved.
    #[error("a newer result ({stored}) is already on record; this attempt was not saved")]
    NewerResultStored { stored: ConditionLabel },

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("submission {submission} was superseded")]
    Superseded { submission: u64 },

    #[error("cannot {event} while {from}")]
    InvalidTransition {
        from: SessionPhase,
        event: &'static str,
    },
}

impl DiagnosticError {
    /// True for the errors that leave the session in `Error` with a retry
    /// available.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            DiagnosticError::PersistenceWrite(_)
                | DiagnosticError::WriteTimedOut { .. }
                | DiagnosticError::NewerResultStored { .. }
        )
    }
}
