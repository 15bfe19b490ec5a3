//! Port abstraction for outbound mail dispatch.

use async_trait::async_trait;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by mail adapters after their own retries.
    pub enum MailError {
        /// The message could not be delivered to the mail service.
        Dispatch { message: String } => "mail dispatch failed: {message}",
    }
}

/// Invitation message sent after a successful Register+Invite flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationEmail {
    /// Recipient username, used in the greeting.
    pub username: String,
    /// Recipient address.
    pub email: String,
    /// Activation link carrying the cleartext one-time token.
    pub activation_url: String,
}

/// Outbound mail collaborator.
///
/// Dispatch is not transactional with the registration insert; the
/// registration service compensates when it fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver an invitation message.
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<(), MailError>;
}
