//! Caller identity threaded through every mutating engine call.

use grove_core::types::DbId;

/// The user on whose behalf a registry call runs.
///
/// The username is recorded as the author of the audit transaction;
/// the ID is what ownership checks compare.
#[derive(Debug, Clone)]
pub struct RegistryContext {
    pub user_id: DbId,
    pub username: String,
}

impl RegistryContext {
    pub fn new(user_id: DbId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}
