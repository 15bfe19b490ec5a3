//! Cache-aside read path for user profiles.
//!
//! Contract: consult the cache first; on a hit return the snapshot without
//! touching the store; on a miss read the authoritative repository and
//! populate the cache best-effort before returning. The cache is an
//! optimization, never a correctness dependency — every cache failure is
//! logged and swallowed, and a miss is never proof of absence.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{UserCache, UserRepository};
use crate::domain::user::User;
use crate::domain::{ApiResult, Error};

/// Read-side service combining the user repository with its side cache.
#[derive(Clone)]
pub struct CachedUserReader {
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn UserCache>,
}

impl CachedUserReader {
    /// Create a reader over the given repository and cache.
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn UserCache>) -> Self {
        Self { users, cache }
    }

    /// Fetch an active user, preferring the cached snapshot.
    ///
    /// Callers that need read-your-write consistency must accept staleness
    /// bounded by the cache TTL or read the repository directly.
    pub async fn get(&self, id: i64) -> ApiResult<User> {
        match self.cache.get(id).await {
            Ok(Some(user)) => return Ok(user),
            Ok(None) => {}
            Err(error) => {
                // An unreachable cache degrades to a miss, never an error.
                warn!(user_id = id, %error, "user cache read failed");
            }
        }

        let user = self.users.find_by_id(id).await.map_err(Error::from)?;

        if let Err(error) = self.cache.set(&user).await {
            warn!(user_id = id, %error, "user cache population failed");
        }

        Ok(user)
    }
}
