//! Registration, activation, and account deletion flows.
//!
//! Register+Invite persists a user row together with one hashed invitation
//! token as a single unit of work, then dispatches the invitation mail.
//! Mail dispatch is deliberately outside the transaction; when it fails
//! the service compensates by deleting the just-created account so no
//! never-activatable account survives.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::credentials::{hash_password, token_digest};
use crate::domain::ports::{InvitationEmail, Mailer, RoleRepository, UserRepository};
use crate::domain::role::ROLE_USER;
use crate::domain::user::{NewUser, User};
use crate::domain::{ApiResult, Error};

/// Validated registration input (cleartext password).
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    /// Requested unique username.
    pub username: String,
    /// Requested unique email.
    pub email: String,
    /// Cleartext password, hashed before it reaches any port.
    pub password: String,
}

/// Result of a successful registration.
///
/// `plain_token` is the only time the invitation token exists in
/// cleartext; the store keeps a one-way digest.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    /// The created (inactive) account.
    pub user: User,
    /// One-time activation token to hand to the caller.
    pub plain_token: String,
}

/// Settings for the registration flows.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// How long an invitation stays redeemable.
    pub invitation_ttl: std::time::Duration,
    /// Base URL the activation link points at.
    pub activation_base_url: String,
}

/// Domain service implementing the composite account lifecycle flows.
#[derive(Clone)]
pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    mailer: Arc<dyn Mailer>,
    config: RegistrationConfig,
}

impl RegistrationService {
    /// Create the service over its collaborating ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        mailer: Arc<dyn Mailer>,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            users,
            roles,
            mailer,
            config,
        }
    }

    /// Register an account and dispatch its invitation.
    ///
    /// On mail failure the created user (and, through the store's cleanup,
    /// its invitation) is deleted again; the compensation itself is
    /// best-effort and only logged when it fails.
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<RegisteredUser> {
        let role = self.roles.find_by_name(ROLE_USER).await.map_err(Error::from)?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            role_id: role.id,
        };

        let plain_token = Uuid::new_v4().to_string();
        let user = self
            .users
            .create_with_invitation(
                &new_user,
                &token_digest(&plain_token),
                self.config.invitation_ttl,
            )
            .await
            .map_err(Error::from)?;

        let invitation = InvitationEmail {
            username: user.username.clone(),
            email: user.email.clone(),
            activation_url: format!("{}/confirm/{plain_token}", self.config.activation_base_url),
        };
        if let Err(mail_error) = self.mailer.send_invitation(&invitation).await {
            warn!(user_id = user.id, %mail_error, "invitation dispatch failed; compensating");
            if let Err(delete_error) = self.users.delete(user.id).await {
                error!(
                    user_id = user.id,
                    %delete_error,
                    "compensating delete failed after mail dispatch failure"
                );
            }
            return Err(Error::internal("could not deliver the invitation email"));
        }

        info!(user_id = user.id, "registered user and dispatched invitation");
        Ok(RegisteredUser { user, plain_token })
    }

    /// Redeem an invitation token, activating the account.
    pub async fn activate(&self, plain_token: &str) -> ApiResult<()> {
        self.users
            .activate(&token_digest(plain_token))
            .await
            .map_err(Error::from)
    }

    /// Delete an account together with any residual invitations.
    pub async fn delete(&self, user_id: i64) -> ApiResult<()> {
        self.users.delete(user_id).await.map_err(Error::from)
    }
}
