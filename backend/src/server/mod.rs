//! Server construction and dependency wiring.

pub mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

use crate::domain::cached_users::CachedUserReader;
use crate::domain::rate_limit::FixedWindowLimiter;
use crate::domain::registration::{RegistrationConfig, RegistrationService};
use crate::inbound::http;
use crate::inbound::http::state::HttpState;
use crate::middleware::RateLimit;
use crate::outbound::auth::JwtAuthenticator;
use crate::outbound::cache::RedisUserCache;
use crate::outbound::mail::{HttpMailer, MailerSettings};
use crate::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselPostRepository, DieselRoleRepository,
    DieselUserRepository, PoolConfig,
};

/// Construct the HTTP dependency bundle from validated configuration.
///
/// # Errors
///
/// Returns an error when a backing service handle cannot be constructed;
/// connectivity itself is verified lazily on first use.
pub async fn build_state(config: &AppConfig) -> std::io::Result<HttpState> {
    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;

    let clock = Arc::new(DefaultClock);

    let users = Arc::new(DieselUserRepository::new(pool.clone(), clock.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let comments = Arc::new(DieselCommentRepository::new(pool.clone()));
    let roles = Arc::new(DieselRoleRepository::new(pool));

    let cache = Arc::new(
        RedisUserCache::connect(&config.redis_url)
            .await
            .map_err(std::io::Error::other)?,
    );

    let mail_endpoint = config
        .mail_endpoint
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid mail endpoint: {err}")))?;
    let mailer = Arc::new(
        HttpMailer::new(
            mail_endpoint,
            MailerSettings::new(&config.mail_from, &config.mail_api_key, config.mail_sandbox),
        )
        .map_err(std::io::Error::other)?,
    );

    let registration = RegistrationService::new(
        users.clone(),
        roles.clone(),
        mailer,
        RegistrationConfig {
            invitation_ttl: config.invitation_ttl,
            activation_base_url: config.activation_base_url.clone(),
        },
    );

    Ok(HttpState {
        registration,
        user_reader: CachedUserReader::new(users.clone(), cache),
        users,
        posts,
        comments,
        roles,
        tokens: Arc::new(JwtAuthenticator::new(config.jwt.clone(), clock)),
    })
}

/// Run the HTTP server until shutdown.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    let state = build_state(&config).await?;
    let limiter = Arc::new(FixedWindowLimiter::new(
        config.rate_limit_budget,
        config.rate_limit_window,
        Arc::new(DefaultClock),
    ));

    info!(addr = %config.bind_addr, "starting http server");
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RateLimit::new(Arc::clone(&limiter)))
            .configure(http::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
