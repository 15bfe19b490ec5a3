//! User aggregate and registration inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// `password_hash` is never serialised; cached snapshots round-trip through
/// JSON without it (the login path always reads the authoritative store),
/// so deserialisation fills it with an empty default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Surrogate identifier assigned by the store.
    pub id: i64,
    /// Globally unique display handle.
    pub username: String,
    /// Globally unique contact address.
    pub email: String,
    /// Argon2 digest of the account password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Inactive accounts are invisible to read queries until activation.
    pub is_active: bool,
    /// Reference into the read-only roles table.
    pub role_id: i64,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for the Register+Invite composite flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Requested unique username.
    pub username: String,
    /// Requested unique email address.
    pub email: String,
    /// Already-hashed password; cleartext never crosses this boundary.
    pub password_hash: String,
    /// Role granted at registration.
    pub role_id: i64,
}
