//! Port abstraction for post persistence adapters.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::feed::{FeedItem, FeedQuery};
use crate::domain::post::{NewPost, Post, PostUpdate};

/// Typed CRUD, optimistic updates, and feed aggregation over posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post at version 1.
    async fn create(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Post, StoreError>;

    /// Conditionally apply `update` where the stored version equals
    /// `expected_version`, incrementing the version by exactly 1.
    ///
    /// When zero rows match, the adapter must disambiguate: an existing
    /// row at another version is a
    /// [`ConflictRule::VersionMismatch`](super::ConflictRule); a missing
    /// row is `NotFound`. Either way there is no side effect.
    async fn update(&self, update: &PostUpdate) -> Result<Post, StoreError>;

    /// Delete a post. Zero affected rows is `NotFound`.
    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Page of all posts, newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, StoreError>;

    /// Page of posts authored by `user_id` or accounts it follows, each
    /// annotated with author and comment count, ordered by creation time
    /// in the requested direction.
    async fn feed(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<FeedItem>, StoreError>;
}
