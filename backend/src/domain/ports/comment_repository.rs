//! Port abstraction for comment persistence adapters.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};

/// Comment writes and the joined per-post read model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment.
    async fn create(&self, comment: &NewComment) -> Result<Comment, StoreError>;

    /// All comments for a post with their authors, newest first.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, StoreError>;
}
