//! Posts API handlers.
//!
//! ```text
//! POST   /v1/posts
//! GET    /v1/posts
//! GET    /v1/posts/{id}
//! PATCH  /v1/posts/{id}
//! DELETE /v1/posts/{id}
//! ```
//!
//! Updates are guarded optimistically: the client echoes the version it
//! read, and a stale version is answered with 409 rather than silently
//! overwriting a concurrent edit.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::authz::require_permission;
use crate::domain::comment::CommentWithAuthor;
use crate::domain::feed::MAX_FEED_LIMIT;
use crate::domain::post::{MAX_TAGS, NewPost, Post, PostUpdate};
use crate::domain::role::{ROLE_ADMIN, ROLE_MODERATOR};
use crate::domain::{ApiResult, Error};
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

const MAX_TITLE_LEN: usize = 100;
const MAX_CONTENT_LEN: usize = 1000;
const DEFAULT_LIST_LIMIT: i64 = 10;

/// Pagination query for the public posts listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListParams {
    fn bounds(&self) -> Result<(i64, i64), Error> {
        let limit = self.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let offset = self.offset.unwrap_or(0);
        if !(1..=MAX_FEED_LIMIT).contains(&limit) {
            return Err(Error::invalid_request(format!(
                "limit must be between 1 and {MAX_FEED_LIMIT}"
            )));
        }
        if offset < 0 {
            return Err(Error::invalid_request("offset must not be negative"));
        }
        Ok((limit, offset))
    }
}

/// Post creation request body.
#[derive(Debug, Deserialize)]
pub struct CreatePostPayload {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update request body. Absent fields keep their stored value;
/// `version` must echo the version the client last read.
#[derive(Debug, Deserialize)]
pub struct UpdatePostPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub version: i32,
}

/// A post together with its comments, newest first.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<CommentWithAuthor>,
}

fn validate_title(title: &str) -> Result<(), Error> {
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(Error::invalid_request(format!(
            "title must be between 1 and {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), Error> {
    if content.is_empty() || content.len() > MAX_CONTENT_LEN {
        return Err(Error::invalid_request(format!(
            "content must be between 1 and {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), Error> {
    if tags.len() > MAX_TAGS {
        return Err(Error::invalid_request(format!(
            "a post carries at most {MAX_TAGS} tags"
        )));
    }
    if tags.iter().any(String::is_empty) {
        return Err(Error::invalid_request("tags must not be empty"));
    }
    Ok(())
}

/// Check that the caller owns the post or holds the named role.
///
/// Ownership short-circuits before any role lookup so the common case
/// costs no extra store reads.
async fn authorize(
    state: &HttpState,
    identity: &Identity,
    owner_id: i64,
    required_role: &str,
) -> ApiResult<()> {
    if identity.user.id == owner_id {
        return Ok(());
    }

    let actor_role = state.roles.find_by_id(identity.user.role_id).await?;
    let required = state.roles.find_by_name(required_role).await?;
    require_permission(identity.user.id, actor_role.level, owner_id, required.level)
}

/// Publish a post owned by the authenticated caller.
#[post("")]
pub async fn create_post(
    state: web::Data<HttpState>,
    identity: Identity,
    payload: web::Json<CreatePostPayload>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    validate_title(&payload.title)?;
    validate_content(&payload.content)?;
    validate_tags(&payload.tags)?;

    let post = state
        .posts
        .create(&NewPost {
            user_id: identity.user.id,
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Page through all posts, newest first.
#[get("")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    _identity: Identity,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Vec<Post>>> {
    let (limit, offset) = params.bounds()?;
    let posts = state.posts.list(limit, offset).await?;
    Ok(web::Json(posts))
}

/// Fetch a post with its comments.
#[get("/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    _identity: Identity,
    id: web::Path<i64>,
) -> ApiResult<web::Json<PostDetail>> {
    let id = id.into_inner();
    let post = state.posts.find_by_id(id).await?;
    let comments = state.comments.list_for_post(id).await?;
    Ok(web::Json(PostDetail { post, comments }))
}

/// Apply a guarded partial update to a post.
///
/// Requires ownership or the moderator role.
#[patch("/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<i64>,
    payload: web::Json<UpdatePostPayload>,
) -> ApiResult<web::Json<Post>> {
    let id = id.into_inner();
    let payload = payload.into_inner();

    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(content) = &payload.content {
        validate_content(content)?;
    }
    if let Some(tags) = &payload.tags {
        validate_tags(tags)?;
    }

    let current = state.posts.find_by_id(id).await?;
    authorize(&state, &identity, current.user_id, ROLE_MODERATOR).await?;

    let update = PostUpdate {
        id,
        title: payload.title.unwrap_or(current.title),
        content: payload.content.unwrap_or(current.content),
        tags: payload.tags.unwrap_or(current.tags),
        expected_version: payload.version,
    };
    let updated = state.posts.update(&update).await?;

    Ok(web::Json(updated))
}

/// Delete a post.
///
/// Requires ownership or the admin role.
#[delete("/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    identity: Identity,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = id.into_inner();
    let post = state.posts.find_by_id(id).await?;
    authorize(&state, &identity, post.user_id, ROLE_ADMIN).await?;

    state.posts.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
