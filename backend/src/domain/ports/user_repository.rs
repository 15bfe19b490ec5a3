//! Port abstraction for user persistence adapters.

use std::time::Duration;

use async_trait::async_trait;

use super::StoreError;
use crate::domain::user::{NewUser, User};

/// Typed CRUD and relationship operations over user records.
///
/// Composite operations (`create_with_invitation`, `activate`, `delete`)
/// are units of work: the adapter must apply all of their steps inside one
/// transaction, or none of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register+Invite: insert the user row and one invitation row holding
    /// `token_hash` with expiry `now + ttl`. Both persist or neither does.
    ///
    /// Duplicate email or username reports the matching [`ConflictRule`]
    /// (`super::ConflictRule`) without creating either row.
    async fn create_with_invitation(
        &self,
        user: &NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<User, StoreError>;

    /// Activate+Cleanup: resolve the user through an unexpired invitation
    /// matching `token_hash`, flip the active flag, and delete the consumed
    /// invitation atomically. Unknown or expired tokens are `NotFound`.
    async fn activate(&self, token_hash: &str) -> Result<(), StoreError>;

    /// Delete+Cleanup: remove the user row and any residual invitation
    /// rows. Zero deleted user rows is `NotFound`.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Fetch an active user by identifier.
    async fn find_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// Fetch an active user by email.
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Record that `follower_id` follows `user_id`. A duplicate edge is a
    /// [`ConflictRule::DuplicateFollow`](super::ConflictRule) conflict.
    async fn follow(&self, user_id: i64, follower_id: i64) -> Result<(), StoreError>;

    /// Remove a follow edge. Decided on the affected-row count: zero rows
    /// is `NotFound`, not success.
    async fn unfollow(&self, user_id: i64, follower_id: i64) -> Result<(), StoreError>;
}
