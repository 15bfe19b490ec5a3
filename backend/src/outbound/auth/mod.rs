//! JWT implementation of the token authenticator port.
//!
//! Tokens are HS256-signed bearer credentials carrying the user identifier
//! as subject. Validation enforces signature, expiry, not-before, issuer,
//! and audience; a token failing any of these is rejected outright.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenAuthenticator, TokenError};

/// Registered claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    iss: String,
    aud: String,
}

/// Signing and validation settings for issued tokens.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Shared HMAC secret.
    pub secret: String,
    /// Value of the issuer claim, checked on validation.
    pub issuer: String,
    /// Value of the audience claim, checked on validation.
    pub audience: String,
    /// Token lifetime from issuance.
    pub ttl: Duration,
}

/// HS256 token authenticator.
pub struct JwtAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    settings: JwtSettings,
    clock: Arc<dyn Clock>,
}

impl JwtAuthenticator {
    /// Build an authenticator from `settings`, stamping claims from `clock`.
    pub fn new(settings: JwtSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            settings,
            clock,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_audience(&[&self.settings.audience]);
        validation.validate_nbf = true;
        validation
    }
}

impl TokenAuthenticator for JwtAuthenticator {
    fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let now = self.clock.utc().timestamp();
        let ttl = i64::try_from(self.settings.ttl.as_secs())
            .map_err(|_| TokenError::issuance("token ttl out of range"))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            nbf: now,
            exp: now + ttl,
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| TokenError::issuance(err.to_string()))
    }

    fn validate(&self, token: &str) -> Result<i64, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation())
            .map_err(|err| TokenError::invalid(err.to_string()))?;

        data.claims
            .sub
            .parse()
            .map_err(|_| TokenError::invalid("subject is not a user identifier"))
    }
}
