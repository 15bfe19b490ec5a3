//! Comment entity and its joined read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Surrogate identifier assigned by the store.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Authoring user.
    pub user_id: i64,
    /// Comment body.
    pub content: String,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Authoring user.
    pub user_id: i64,
    /// Comment body.
    pub content: String,
}

/// Comment joined with its author's username for list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    /// The comment record.
    #[serde(flatten)]
    pub comment: Comment,
    /// Username of the authoring user at read time.
    pub author: String,
}
