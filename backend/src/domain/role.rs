//! Read-only role reference data.

use serde::{Deserialize, Serialize};

/// Role granted to regular accounts at registration.
pub const ROLE_USER: &str = "user";
/// Role allowed to update other users' posts.
pub const ROLE_MODERATOR: &str = "moderator";
/// Role allowed to delete other users' posts.
pub const ROLE_ADMIN: &str = "admin";

/// A privilege tier; higher `level` grants strictly more capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Surrogate identifier assigned by the store.
    pub id: i64,
    /// Unique role name.
    pub name: String,
    /// Numeric privilege level used by capability checks.
    pub level: i32,
    /// Human-readable description.
    pub description: String,
}
