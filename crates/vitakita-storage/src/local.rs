use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use vitakita_core::doc_keys;
use vitakita_core::models::diagnostic::{DiagnosticResult, UserDiagnosticState};
use vitakita_core::models::profile::{MergeOutcome, UserProfile};

use crate::error::StorageError;
use crate::port::{BoxFuture, ProfileStore};

/// Profile documents as JSON files under a local directory, laid out with the
/// same keys as the S3 bucket.
///
/// Writes are atomic (tmp + rename) and serialized within the process.
pub struct LocalProfileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, user_id: &str) -> Result<(String, PathBuf), StorageError> {
        let key = doc_keys::user_profile(doc_keys::validate_uid(user_id)?);
        let path = self.root.join(&key);
        Ok((key, path))
    }

    async fn read(&self, key: &str, path: &Path) -> Result<UserProfile, StorageError> {
        let json = match tokio::fs::read(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    key: key.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&json)?)
    }

    async fn load(&self, user_id: &str) -> Result<UserProfile, StorageError> {
        let (key, path) = self.path_for(user_id)?;
        let profile = self.read(&key, &path).await?;
        tracing::debug!(path = %path.display(), "profile loaded from local disk");
        Ok(profile)
    }

    async fn save(
        &self,
        user_id: &str,
        result: &DiagnosticResult,
        state: &UserDiagnosticState,
    ) -> Result<MergeOutcome, StorageError> {
        let (key, path) = self.path_for(user_id)?;
        let _guard = self.write_lock.lock().await;

        let now = jiff::Timestamp::now();
        let mut profile = match self.read(&key, &path).await {
            Ok(profile) => profile,
            Err(StorageError::NotFound { .. }) => UserProfile::new(user_id, now),
            Err(e) => return Err(e),
        };

        match profile.apply_result(result, state, now) {
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

        let json = serde_json::to_vec_pretty(&profile)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!(
            path = %path.display(),
            label = %result.label,
            "diagnostic result saved to local disk"
        );
        Ok(MergeOutcome::Applied)
    }
}

impl ProfileStore for LocalProfileStore {
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
