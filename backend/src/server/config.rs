//! Environment-driven application configuration.
//!
//! This module centralises the environment settings so they are validated
//! consistently and can be tested in isolation.

use std::net::SocketAddr;
use std::time::Duration;

use mockable::Env;

use crate::outbound::auth::JwtSettings;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const REDIS_URL_ENV: &str = "REDIS_URL";
const JWT_SECRET_ENV: &str = "JWT_SECRET";
const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";
const JWT_TTL_SECS_ENV: &str = "JWT_TTL_SECS";
const INVITATION_TTL_SECS_ENV: &str = "INVITATION_TTL_SECS";
const ACTIVATION_BASE_URL_ENV: &str = "ACTIVATION_BASE_URL";
const MAIL_ENDPOINT_ENV: &str = "MAIL_ENDPOINT";
const MAIL_API_KEY_ENV: &str = "MAIL_API_KEY";
const MAIL_FROM_ENV: &str = "MAIL_FROM";
const MAIL_SANDBOX_ENV: &str = "MAIL_SANDBOX";
const RATE_LIMIT_BUDGET_ENV: &str = "RATE_LIMIT_BUDGET";
const RATE_LIMIT_WINDOW_SECS_ENV: &str = "RATE_LIMIT_WINDOW_SECS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_ISSUER: &str = "backend";
const DEFAULT_JWT_AUDIENCE: &str = "backend-clients";
const DEFAULT_JWT_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);
const DEFAULT_INVITATION_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);
const DEFAULT_MAIL_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";
const DEFAULT_RATE_LIMIT_BUDGET: u32 = 20;
const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(5);

/// Errors raised while validating application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Complete application settings assembled from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Redis connection string for the user snapshot cache.
    pub redis_url: String,
    /// Bearer token settings.
    pub jwt: JwtSettings,
    /// How long invitation tokens stay redeemable.
    pub invitation_ttl: Duration,
    /// Base URL activation links point at.
    pub activation_base_url: String,
    /// HTTP endpoint of the mail service.
    pub mail_endpoint: String,
    /// Credential for the mail service.
    pub mail_api_key: String,
    /// Sender address for invitations.
    pub mail_from: String,
    /// Whether the mail service should accept without delivering.
    pub mail_sandbox: bool,
    /// Requests admitted per caller per window.
    pub rate_limit_budget: u32,
    /// Length of the admission window.
    pub rate_limit_window: Duration,
}

fn required<E: Env>(env: &E, name: &'static str) -> Result<String, ConfigError> {
    env.string(name).ok_or(ConfigError::MissingEnv { name })
}

fn parsed<E, T>(env: &E, name: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    E: Env,
    T: std::str::FromStr,
{
    match env.string(name) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ConfigError::InvalidEnv {
            name,
            value,
            expected,
        }),
    }
}

fn boolean<E: Env>(env: &E, name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env.string(name) {
        None => Ok(default),
        Some(value) => match value.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidEnv {
                name,
                value,
                expected: "1|0|true|false|yes|no",
            }),
        },
    }
}

fn duration_secs<E: Env>(
    env: &E,
    name: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    Ok(parsed::<E, u64>(env, name, "a number of seconds")?
        .map_or(default, Duration::from_secs))
}

impl AppConfig {
    /// Assemble settings from environment variables.
    ///
    /// Connection strings and the signing secret are required; everything
    /// else falls back to a documented default.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let bind_addr = match env.string(BIND_ADDR_ENV) {
            None => DEFAULT_BIND_ADDR.parse().map_err(|_| ConfigError::InvalidEnv {
                name: BIND_ADDR_ENV,
                value: DEFAULT_BIND_ADDR.into(),
                expected: "a socket address",
            })?,
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
                name: BIND_ADDR_ENV,
                value,
                expected: "a socket address such as 0.0.0.0:8080",
            })?,
        };

        Ok(Self {
            bind_addr,
            database_url: required(env, DATABASE_URL_ENV)?,
            redis_url: required(env, REDIS_URL_ENV)?,
            jwt: JwtSettings {
                secret: required(env, JWT_SECRET_ENV)?,
                issuer: env
                    .string(JWT_ISSUER_ENV)
                    .unwrap_or_else(|| DEFAULT_JWT_ISSUER.into()),
                audience: env
                    .string(JWT_AUDIENCE_ENV)
                    .unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.into()),
                ttl: duration_secs(env, JWT_TTL_SECS_ENV, DEFAULT_JWT_TTL)?,
            },
            invitation_ttl: duration_secs(env, INVITATION_TTL_SECS_ENV, DEFAULT_INVITATION_TTL)?,
            activation_base_url: required(env, ACTIVATION_BASE_URL_ENV)?,
            mail_endpoint: env
                .string(MAIL_ENDPOINT_ENV)
                .unwrap_or_else(|| DEFAULT_MAIL_ENDPOINT.into()),
            mail_api_key: required(env, MAIL_API_KEY_ENV)?,
            mail_from: required(env, MAIL_FROM_ENV)?,
            mail_sandbox: boolean(env, MAIL_SANDBOX_ENV, true)?,
            rate_limit_budget: parsed::<E, u32>(env, RATE_LIMIT_BUDGET_ENV, "a request count")?
                .unwrap_or(DEFAULT_RATE_LIMIT_BUDGET),
            rate_limit_window: duration_secs(
                env,
                RATE_LIMIT_WINDOW_SECS_ENV,
                DEFAULT_RATE_LIMIT_WINDOW,
            )?,
        })
    }
}
