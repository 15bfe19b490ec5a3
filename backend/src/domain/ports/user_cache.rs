//! Port abstraction for the side cache holding user snapshots.

use async_trait::async_trait;

use super::macros::define_port_error;
use crate::domain::user::User;

define_port_error! {
    /// Failures raised by cache adapters.
    ///
    /// These never surface as request failures; the cache-aside read path
    /// logs and swallows them.
    pub enum CacheError {
        /// The cache backend could not be reached.
        Backend { message: String } => "cache backend failed: {message}",
        /// A snapshot could not be encoded or decoded.
        Encoding { message: String } => "cache snapshot encoding failed: {message}",
    }
}

/// Keyed user snapshots with a bounded time to live.
///
/// Entries are a disposable projection: never authoritative, potentially
/// stale at any moment, and a miss is not proof of absence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCache: Send + Sync {
    /// Look up a cached snapshot.
    async fn get(&self, id: i64) -> Result<Option<User>, CacheError>;

    /// Store a snapshot under the adapter's configured TTL, overwriting
    /// any previous entry for the same user.
    async fn set(&self, user: &User) -> Result<(), CacheError>;
}
