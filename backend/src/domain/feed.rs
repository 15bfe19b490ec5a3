//! Feed query specification and read model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::post::MAX_TAGS;

/// Largest page a single feed request may ask for.
pub const MAX_FEED_LIMIT: i64 = 100;
/// Longest accepted free-text search term.
pub const MAX_SEARCH_LEN: usize = 100;

/// Sort order for feed pages.
///
/// Parsed from a closed set; unrecognized directions are rejected before
/// the query layer so caller input is never interpolated into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Oldest posts first.
    Asc,
    /// Newest posts first.
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction. Safe by construction.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::invalid_request(format!(
                "unrecognized sort direction: {other}"
            ))),
        }
    }
}

/// Validated specification for one feed page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    /// Page size, `1..=MAX_FEED_LIMIT`.
    pub limit: i64,
    /// Offset-based pagination start; may skip or duplicate rows under
    /// concurrent inserts, an accepted limitation.
    pub offset: i64,
    /// Creation-time sort direction.
    pub sort: SortDirection,
    /// Posts must carry every listed tag; empty means no tag filter.
    pub tags: Vec<String>,
    /// Case-insensitive match against title and content.
    pub search: Option<String>,
    /// Lower creation-time bound, inclusive.
    pub since: Option<DateTime<Utc>>,
    /// Upper creation-time bound, inclusive.
    pub until: Option<DateTime<Utc>>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            sort: SortDirection::Desc,
            tags: Vec::new(),
            search: None,
            since: None,
            until: None,
        }
    }
}

impl FeedQuery {
    /// Reject out-of-range specifications before they reach the store.
    pub fn validate(&self) -> Result<(), Error> {
        if self.limit < 1 || self.limit > MAX_FEED_LIMIT {
            return Err(Error::invalid_request(format!(
                "limit must be between 1 and {MAX_FEED_LIMIT}"
            )));
        }
        if self.offset < 0 {
            return Err(Error::invalid_request("offset must not be negative"));
        }
        if self.tags.len() > MAX_TAGS {
            return Err(Error::invalid_request(format!(
                "at most {MAX_TAGS} tags may be filtered"
            )));
        }
        if let Some(search) = &self.search
            && search.chars().count() > MAX_SEARCH_LEN
        {
            return Err(Error::invalid_request(format!(
                "search term must not exceed {MAX_SEARCH_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// One feed row: a post annotated with its author and comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Post identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Author's username at read time.
    pub author: String,
    /// Post title.
    pub title: String,
    /// Post body.
    pub content: String,
    /// Tag set.
    pub tags: Vec<String>,
    /// Current post version.
    pub version: i32,
    /// Post creation timestamp; drives feed ordering.
    pub created_at: DateTime<Utc>,
    /// Number of comments on the post at read time.
    pub comment_count: i64,
}
