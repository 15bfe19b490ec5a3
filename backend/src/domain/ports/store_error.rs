//! Error taxonomy shared by every repository port.
//!
//! Classification happens exactly once, at the store boundary; callers
//! never re-interpret driver-specific detail downstream.

use crate::domain::{Error, ErrorCode};

/// Which uniqueness rule a conflicting write violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictRule {
    /// There is already an account with that email.
    DuplicateEmail,
    /// The username is already taken.
    DuplicateUsername,
    /// The follow edge already exists.
    DuplicateFollow,
    /// The caller-supplied post version no longer matches the stored one.
    VersionMismatch,
}

impl std::fmt::Display for ConflictRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            Self::DuplicateEmail => "an account with that email already exists",
            Self::DuplicateUsername => "that username is already taken",
            Self::DuplicateFollow => "the follow relationship already exists",
            Self::VersionMismatch => "the post was modified by someone else",
        };
        f.write_str(description)
    }
}

/// Classified failure of a repository operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No matching row. Also reported by deletes affecting zero rows.
    #[error("resource not found")]
    NotFound,
    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(ConflictRule),
    /// The store could not be reached or the call timed out.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Connection-level detail, safe for logs only.
        message: String,
    },
    /// Opaque infrastructure failure; never interpreted by callers.
    #[error("store query failed: {message}")]
    Query {
        /// Driver detail, safe for logs only.
        message: String,
    },
}

impl StoreError {
    /// Construct the `Unavailable` variant.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Construct the `Query` variant.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::not_found("resource not found"),
            StoreError::Conflict(rule) => Self::conflict(rule.to_string()),
            StoreError::Unavailable { message } => Self::service_unavailable(message),
            StoreError::Query { message } => Self::internal(message),
        }
    }
}
