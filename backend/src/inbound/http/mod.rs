//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod comments;
pub mod error;
pub mod feed;
pub mod health;
pub mod identity;
pub mod posts;
pub mod state;
pub mod users;

use actix_web::web;

pub use crate::domain::ApiResult;

/// Mount all API routes under the versioned prefix.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .service(health::health)
            .service(
                web::scope("/authentication")
                    .service(auth::register)
                    .service(auth::create_token),
            )
            .service(
                web::scope("/users")
                    .service(auth::activate)
                    .service(feed::feed)
                    .service(users::get_user)
                    .service(users::follow_user)
                    .service(users::unfollow_user),
            )
            .service(
                web::scope("/posts")
                    .service(posts::create_post)
                    .service(posts::list_posts)
                    .service(posts::get_post)
                    .service(posts::update_post)
                    .service(posts::delete_post)
                    .service(comments::create_comment)
                    .service(comments::list_comments),
            ),
    );
}
