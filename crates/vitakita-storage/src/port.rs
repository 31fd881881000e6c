use std::future::Future;
use std::pin::Pin;

use vitakita_core::models::diagnostic::{DiagnosticResult, UserDiagnosticState};
use vitakita_core::models::profile::{MergeOutcome, UserProfile};

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence port for user profile documents.
///
/// Stores are best-effort: the only ordering guarantee is that a result never
/// replaces one submitted after it. Methods return boxed futures for dyn
/// compatibility.
pub trait ProfileStore: Send + Sync {
    /// Load the full profile document. `StorageError::NotFound` if the user
    /// has no document yet.
    fn load_profile<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<UserProfile, StorageError>>;

    /// Merge a result into the user's profile, creating the document if it
    /// does not exist.
    fn save_diagnostic_result<'a>(
        &'a self,
        user_id: &'a str,
        result: &'a DiagnosticResult,
        state: &'a UserDiagnosticState,
    ) -> BoxFuture<'a, Result<MergeOutcome, StorageError>>;

    fn load_user_diagnostic_state<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<UserDiagnosticState, StorageError>> {
        Box::pin(async move { Ok(self.load_profile(user_id).await?.diagnostic_state()) })
    }

    /// The most recently submitted result, if any has been saved.
    fn load_last_result<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<DiagnosticResult>, StorageError>> {
        Box::pin(async move {
            match self.load_profile(user_id).await {
                Ok(profile) => Ok(profile.latest_result().cloned()),
                Err(StorageError::NotFound { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }
}
