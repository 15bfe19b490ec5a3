//! Comments API handlers.
//!
//! ```text
//! POST /v1/posts/{id}/comments
//! GET  /v1/posts/{id}/comments
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;

use crate::domain::comment::NewComment;
use crate::domain::{ApiResult, Error};
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

const MAX_COMMENT_LEN: usize = 1000;

/// Comment creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateCommentPayload {
    pub content: String,
}

fn validate_comment(content: &str) -> Result<(), Error> {
    if content.is_empty() || content.len() > MAX_COMMENT_LEN {
        return Err(Error::invalid_request(format!(
            "content must be between 1 and {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Attach a comment to a post as the authenticated caller.
#[post("/{id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<i64>,
    payload: web::Json<CreateCommentPayload>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    validate_comment(&payload.content)?;

    let comment = state
        .comments
        .create(&NewComment {
            post_id: id.into_inner(),
            user_id: identity.user.id,
            content: payload.content,
        })
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// List a post's comments, newest first, with author usernames.
#[get("/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    _identity: Identity,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = id.into_inner();
    // An unknown post is a 404, not an empty list.
    state.posts.find_by_id(id).await?;
    let comments = state.comments.list_for_post(id).await?;
    Ok(HttpResponse::Ok().json(comments))
}
