//! Post aggregate and the version-stamped update input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on the tag set attached to one post.
pub const MAX_TAGS: usize = 5;

/// A published post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Surrogate identifier assigned by the store.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Unordered tag set, bounded by [`MAX_TAGS`].
    pub tags: Vec<String>,
    /// Monotonic version stamp; increments by exactly 1 per update.
    pub version: i32,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last successful update.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Owning user.
    pub user_id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Tag set, bounded by [`MAX_TAGS`].
    pub tags: Vec<String>,
}

/// Version-stamped update applied through the optimistic concurrency guard.
///
/// The store applies the change only where `id` and `expected_version`
/// both match; a stale `expected_version` is reported as a conflict, never
/// silently retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    /// Post to update.
    pub id: i64,
    /// Replacement title.
    pub title: String,
    /// Replacement body.
    pub content: String,
    /// Replacement tag set.
    pub tags: Vec<String>,
    /// Version the caller read before editing.
    pub expected_version: i32,
}
