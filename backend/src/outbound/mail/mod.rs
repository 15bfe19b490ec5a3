//! Reqwest-backed invitation mailer.
//!
//! This adapter owns transport details only: payload construction, bounded
//! retries with linear backoff, and HTTP error mapping. Compensation for
//! undeliverable invitations lives with the registration service, not here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{InvitationEmail, MailError, Mailer};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(2);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sender identity and delivery settings for outbound invitations.
pub struct MailerSettings {
    /// Address invitations are sent from.
    pub from_email: String,
    /// Bearer credential for the mail service.
    pub api_key: String,
    /// When set, the mail service accepts and validates messages without
    /// delivering them. Meant for non-production environments.
    pub sandbox: bool,
    /// Total delivery attempts before giving up.
    pub max_attempts: u32,
    /// Base delay between attempts; attempt `n` waits `n * backoff`.
    pub retry_backoff: Duration,
}

impl MailerSettings {
    /// Settings with default retry behaviour.
    pub fn new(from_email: impl Into<String>, api_key: impl Into<String>, sandbox: bool) -> Self {
        Self {
            from_email: from_email.into(),
            api_key: api_key.into(),
            sandbox,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

/// Mailer adapter that POSTs invitation messages to an HTTP mail service.
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    settings: MailerSettings,
}

impl HttpMailer {
    /// Build a mailer with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, settings: MailerSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DEFAULT_REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint,
            settings,
        })
    }

    async fn attempt(&self, payload: &serde_json::Value) -> Result<(), MailError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.settings.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|err| MailError::dispatch(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(map_status_error(status))
    }
}

fn map_status_error(status: StatusCode) -> MailError {
    MailError::dispatch(format!("mail service returned {status}"))
}

fn build_payload(
    invitation: &InvitationEmail,
    from_email: &str,
    sandbox: bool,
) -> serde_json::Value {
    json!({
        "personalizations": [{
            "to": [{
                "email": invitation.email,
                "name": invitation.username,
            }],
            "dynamic_template_data": {
                "username": invitation.username,
                "activation_url": invitation.activation_url,
            },
        }],
        "from": { "email": from_email },
        "subject": "Finish setting up your account",
        "content": [{
            "type": "text/plain",
            "value": format!(
                "Hi {}, confirm your account at {}",
                invitation.username, invitation.activation_url
            ),
        }],
        "mail_settings": {
            "sandbox_mode": { "enable": sandbox },
        },
    })
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<(), MailError> {
        let payload = build_payload(invitation, &self.settings.from_email, self.settings.sandbox);
        let attempts = self.settings.max_attempts.max(1);

        let mut last_error = MailError::dispatch("no delivery attempt made");
        for attempt in 1..=attempts {
            match self.attempt(&payload).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %err,
                        "invitation delivery attempt failed"
                    );
                    last_error = err;
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.settings.retry_backoff * attempt).await;
            }
        }

        Err(last_error)
    }
}
