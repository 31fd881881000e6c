use aws_sdk_s3::Client;

use vitakita_core::doc_keys;
use vitakita_core::models::diagnostic::{DiagnosticResult, UserDiagnosticState};
use vitakita_core::models::profile::{MergeOutcome, UserProfile};

use crate::error::StorageError;
use crate::port::{BoxFuture, ProfileStore};
use crate::state;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Profile documents stored as JSON objects under `users/` in one bucket.
///
/// Saves are read-modify-write under ETag `If-Match`, retried when another
/// writer got there first.
pub struct S3ProfileStore {
    pub client: Client,
    pub bucket: String,
    pub max_attempts: u32,
}

impl S3ProfileStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    async fn load(&self, user_id: &str) -> Result<UserProfile, StorageError> {
        let key = doc_keys::user_profile(doc_keys::validate_uid(user_id)?);
        let (profile, _etag) = state::load_state(&self.client, &self.bucket, &key).await?;
        tracing::debug!(bucket = %self.bucket, key = %key, "profile loaded from S3");
        Ok(profile)
    }

    async fn save(
        &self,
        user_id: &str,
        result: &DiagnosticResult,
        diag_state: &UserDiagnosticState,
    ) -> Result<MergeOutcome, StorageError> {
        let key = doc_keys::user_profile(doc_keys::validate_uid(user_id)?);

        for attempt in 1..=self.max_attempts {
            let now = jiff::Timestamp::now();
            let existing =
                match state::load_state::<UserProfile>(&self.client, &self.bucket, &key).await {
                    Ok((profile, etag)) => Some((profile, etag)),
                    Err(StorageError::NotFound { .. }) => None,
                    Err(e) => return Err(e),
                };

            let (mut profile, etag) = match existing {
                Some((profile, etag)) => (profile, Some(etag)),
                None => (UserProfile::new(user_id, now), None),
            };

            match profile.apply_result(result, diag_state, now) {
                MergeOutcome::Applied => {}
                MergeOutcome::AlreadyApplied => {
                    tracing::debug!(key = %key, "result already stored, skipping write");
                    return Ok(MergeOutcome::AlreadyApplied);
                }
                superseded @ MergeOutcome::Superseded { current } => {
                    tracing::warn!(
                        key = %key,
                        computed_at = %result.computed_at,
                        current = %current,
                        "stored profile already has a newer result, skipping write"
                    );
                    return Ok(superseded);
                }
            }

            let written = match &etag {
                Some(etag) => {
                    state::save_state_if_match(&self.client, &self.bucket, &key, &profile, etag)
                        .await
                }
                None => {
                    state::save_state_if_absent(&self.client, &self.bucket, &key, &profile).await
                }
            };

            match written {
                Ok(new_etag) => {
                    tracing::debug!(
                        bucket = %self.bucket,
                        key = %key,
                        etag = %new_etag,
                        label = %result.label,
                        "diagnostic result saved to S3"
                    );
                    return Ok(MergeOutcome::Applied);
                }
                Err(StorageError::PreconditionFailed { .. }) => {
                    tracing::warn!(key = %key, attempt, "profile changed during save, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(StorageError::Contention {
            key,
            attempts: self.max_attempts,
        })
    }
}

impl ProfileStore for S3ProfileStore {
    fn load_profile<'a>(
        &'a self,
        user_id: &'a str,
    ) -> BoxFuture<'a, Result<UserProfile, StorageError>> {
        Box::pin(self.load(user_id))
    }

    fn save_diagnostic_result<'a>(
        &'a self,
        user_id: &'a str,
        result: &'a DiagnosticResult,
        state: &'a UserDiagnosticState,
    ) -> BoxFuture<'a, Result<MergeOutcome, StorageError>> {
        Box::pin(self.save(user_id, result, state))
    }
}
