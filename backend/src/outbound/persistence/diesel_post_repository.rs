//! Diesel-backed implementation of the post repository port.
//!
//! Updates go through a single conditional statement keyed on the stored
//! version; the feed read model is a raw aggregation query because Diesel's
//! DSL cannot express the grouped join with array containment.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Array, BigInt, Nullable, Text, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::feed::{FeedItem, FeedQuery, SortDirection};
use crate::domain::ports::{ConflictRule, PostRepository, StoreError};
use crate::domain::post::{NewPost, Post, PostUpdate};

use super::error_mapping::{
    STORE_TIMEOUT, bounded, composite_budget, map_diesel_error, map_pool_error,
    require_affected_rows,
};
use super::models::{FeedRow, NewPostRow, PostRow};
use super::pool::DbPool;
use super::schema::posts;

/// Post persistence adapter over the shared connection pool.
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Aggregation query behind the feed: posts authored by the viewer or by
/// accounts the viewer follows, each with its author name and comment
/// count. Optional filters collapse to always-true predicates when their
/// bind is NULL or empty, so the bind list stays fixed.
///
/// `sort` is interpolated from a closed enum, never from caller input.
fn feed_sql(sort: SortDirection) -> String {
    format!(
        "SELECT p.id, p.user_id, u.username AS author, p.title, p.content, \
                p.tags, p.version, p.created_at, COUNT(c.id) AS comment_count \
         FROM posts p \
         JOIN users u ON u.id = p.user_id \
         LEFT JOIN comments c ON c.post_id = p.id \
         WHERE (p.user_id = $1 \
                OR p.user_id IN (SELECT user_id FROM followers WHERE follower_id = $1)) \
           AND ($2::text IS NULL \
                OR p.title ILIKE '%' || $2 || '%' \
                OR p.content ILIKE '%' || $2 || '%') \
           AND (cardinality($3::text[]) = 0 OR p.tags @> $3) \
           AND ($4::timestamptz IS NULL OR p.created_at >= $4) \
           AND ($5::timestamptz IS NULL OR p.created_at <= $5) \
         GROUP BY p.id, u.username \
         ORDER BY p.created_at {} \
         LIMIT $6 OFFSET $7",
        sort.as_sql()
    )
}

/// Classifies a conditional update that touched zero rows: the post either
/// still exists at another version, or is gone entirely.
fn stale_or_missing(post_exists: bool) -> StoreError {
    if post_exists {
        StoreError::Conflict(ConflictRule::VersionMismatch)
    } else {
        StoreError::NotFound
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post, StoreError> {
        bounded("posts.create", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let new_post = NewPostRow {
                user_id: post.user_id,
                title: &post.title,
                content: &post.content,
                tags: &post.tags,
            };
            let row: PostRow = diesel::insert_into(posts::table)
                .values(&new_post)
                .returning(PostRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Post, StoreError> {
        bounded("posts.find_by_id", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let row: PostRow = posts::table
                .find(id)
                .select(PostRow::as_select())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn update(&self, update: &PostUpdate) -> Result<Post, StoreError> {
        bounded("posts.update", composite_budget(2), async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            // One conditional statement carries the whole guard: the row is
            // touched only where both id and version match, and the version
            // advances in the same statement.
            let updated: Option<PostRow> = diesel::update(
                posts::table
                    .filter(posts::id.eq(update.id))
                    .filter(posts::version.eq(update.expected_version)),
            )
            .set((
                posts::title.eq(&update.title),
                posts::content.eq(&update.content),
                posts::tags.eq(update.tags.as_slice()),
                posts::version.eq(posts::version + 1),
                posts::updated_at.eq(diesel::dsl::now),
            ))
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

            if let Some(row) = updated {
                return Ok(row.into());
            }

            // Zero rows means either a stale version or a missing post;
            // a re-read tells them apart. It races with concurrent deletes,
            // but either answer was true at some point during the call.
            let exists: i64 = posts::table
                .filter(posts::id.eq(update.id))
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Err(stale_or_missing(exists > 0))
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        bounded("posts.delete", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let affected = diesel::delete(posts::table.find(id))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            require_affected_rows(affected)
        })
        .await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, StoreError> {
        bounded("posts.list", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let rows: Vec<PostRow> = posts::table
                .order(posts::created_at.desc())
                .limit(limit)
                .offset(offset)
                .select(PostRow::as_select())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(Into::into).collect())
        })
        .await
    }

    async fn feed(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<FeedItem>, StoreError> {
        bounded("posts.feed", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let rows: Vec<FeedRow> = diesel::sql_query(feed_sql(query.sort))
                .bind::<BigInt, _>(user_id)
                .bind::<Nullable<Text>, _>(query.search.as_deref())
                .bind::<Array<Text>, _>(&query.tags)
                .bind::<Nullable<Timestamptz>, _>(query.since)
                .bind::<Nullable<Timestamptz>, _>(query.until)
                .bind::<BigInt, _>(query.limit)
                .bind::<BigInt, _>(query.offset)
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(FeedItem::from).collect())
        })
        .await
    }
}
