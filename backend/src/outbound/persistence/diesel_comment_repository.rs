//! Diesel-backed implementation of the comment repository port.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::comment::{Comment, CommentWithAuthor, NewComment};
use crate::domain::ports::{CommentRepository, StoreError};

use super::error_mapping::{STORE_TIMEOUT, bounded, map_diesel_error, map_pool_error};
use super::models::{CommentRow, NewCommentRow};
use super::pool::DbPool;
use super::schema::{comments, users};

/// Comment persistence adapter over the shared connection pool.
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn create(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        bounded("comments.create", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let new_comment = NewCommentRow {
                post_id: comment.post_id,
                user_id: comment.user_id,
                content: &comment.content,
            };
            let row: CommentRow = diesel::insert_into(comments::table)
                .values(&new_comment)
                .returning(CommentRow::as_returning())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, StoreError> {
        bounded("comments.list_for_post", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let rows: Vec<(CommentRow, String)> = comments::table
                .inner_join(users::table)
                .filter(comments::post_id.eq(post_id))
                .order(comments::created_at.desc())
                .select((CommentRow::as_select(), users::username))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(rows
                .into_iter()
                .map(|(row, author)| CommentWithAuthor {
                    comment: row.into(),
                    author,
                })
                .collect())
        })
        .await
    }
}
