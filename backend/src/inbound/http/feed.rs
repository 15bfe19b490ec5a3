//! Feed API handler.
//!
//! ```text
//! GET /v1/users/feed?limit=20&offset=0&sort=desc&tags=rust,postgres&search=...&since=...&until=...
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::ApiResult;
use crate::domain::feed::{FeedItem, FeedQuery};
use crate::inbound::http::identity::Identity;
use crate::inbound::http::state::HttpState;

/// Raw query parameters before validation. Tags arrive comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    pub tags: Option<String>,
    pub search: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

fn to_feed_query(params: FeedParams) -> ApiResult<FeedQuery> {
    let defaults = FeedQuery::default();

    let mut query = FeedQuery {
        limit: params.limit.unwrap_or(defaults.limit),
        offset: params.offset.unwrap_or(defaults.offset),
        sort: defaults.sort,
        tags: params
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
        search: params.search.filter(|s| !s.is_empty()),
        since: params.since,
        until: params.until,
    };
    if let Some(sort) = params.sort {
        query.sort = sort.parse()?;
    }

    query.validate()?;
    Ok(query)
}

/// Page through posts by the caller and the accounts it follows.
#[get("/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    identity: Identity,
    params: web::Query<FeedParams>,
) -> ApiResult<web::Json<Vec<FeedItem>>> {
    let query = to_feed_query(params.into_inner())?;
    let items = state.posts.feed(identity.user.id, &query).await?;
    Ok(web::Json(items))
}
