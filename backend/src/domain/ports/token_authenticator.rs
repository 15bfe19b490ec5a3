//! Port abstraction for the bearer-token auth boundary.

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised when issuing or validating bearer tokens.
    pub enum TokenError {
        /// The token is malformed, expired, not yet valid, or carries the
        /// wrong issuer or audience.
        Invalid { message: String } => "invalid token: {message}",
        /// A token could not be signed.
        Issuance { message: String } => "token issuance failed: {message}",
    }
}

/// Issues and validates bearer tokens carrying the acting user identity.
///
/// A validated token's subject claim is trusted as the acting identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenAuthenticator: Send + Sync {
    /// Sign a token for `user_id` with the configured issuer, audience,
    /// and lifetime.
    fn issue(&self, user_id: i64) -> Result<String, TokenError>;

    /// Validate a presented token and return its subject.
    fn validate(&self, token: &str) -> Result<i64, TokenError>;
}
