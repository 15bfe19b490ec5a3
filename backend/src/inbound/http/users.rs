//! Users API handlers.
//!
//! ```text
//! GET /v1/users/{id}
//! PUT /v1/users/{id}/follow
//! PUT /v1/users/{id}/unfollow
//! ```

use actix_web::{HttpResponse, get, put, web};

use crate::domain::ApiResult;
use crate::domain::user::User;
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Fetch a user profile through the cache-aside read path.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _identity: Identity,
    id: web::Path<i64>,
) -> ApiResult<web::Json<User>> {
    let user = state.user_reader.get(id.into_inner()).await?;
    Ok(web::Json(user))
}

/// Follow the addressed user as the authenticated caller.
#[put("/{id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .users
        .follow(id.into_inner(), identity.user.id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove a follow edge previously created by the caller.
#[put("/{id}/unfollow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .users
        .unfollow(id.into_inner(), identity.user.id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
