/// Ownership checks
///
/// Articles may only be changed or removed by their author. The check is a
/// plain id comparison, kept in one place so every write path reports the
/// same error.

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller does not own the resource
    #[error("Unauthorized")]
    NotOwner,
}

/// Succeeds when `requester_id` is `owner_id`
pub fn require_owner(owner_id: Uuid, requester_id: Uuid) -> Result<(), AuthzError> {
    if owner_id == requester_id {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

impl AuthContext {
    /// Checks that the authenticated user owns a resource
    pub fn require_owner_of(&self, owner_id: Uuid) -> Result<(), AuthzError> {
        require_owner(owner_id, self.user_id)
    }
}
