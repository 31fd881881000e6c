//! vitakita-diagnostic
//!
//! The diagnostic session: gates when the questionnaire is shown, collects
//! answers, scores a completed set and hands the result to the profile store.
//! Storage is injected through [`vitakita_storage::port::ProfileStore`].

pub mod config;
pub mod error;
pub mod session;

pub use config::SessionConfig;
pub use error::DiagnosticError;
pub use session::{DiagnosticSession, PendingSubmission, SessionPhase};
