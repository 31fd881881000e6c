//! Document key conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! layout of user documents in whichever store backs the profile port.

use crate::error::CoreError;

pub const USERS_PREFIX: &str = "users/";

pub fn user_profile(uid: &str) -> String {
    format!("users/{uid}.json")
}

/// Reject user ids that would escape the `users/` prefix or collide with
/// the key layout.
pub fn validate_uid(uid: &str) -> Result<&str, CoreError> {
    let ok = !uid.is_empty()
        && uid.len() <= 128
        && uid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    if ok {
        Ok(uid)
    } else {
        Err(CoreError::InvalidUserId(uid.to_string()))
    }
}
