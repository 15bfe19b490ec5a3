//! Diesel-backed implementation of the user repository port.
//!
//! The composite operations run in explicit transactions so partially
//! registered or partially activated accounts can never be observed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use mockable::Clock;

use crate::domain::ports::{StoreError, UserRepository};
use crate::domain::user::{NewUser, User};

use super::error_mapping::{
    STORE_TIMEOUT, bounded, composite_budget, map_diesel_error, map_pool_error,
    require_affected_rows,
};
use super::models::{NewFollowerRow, NewInvitationRow, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{followers, invitations, users};

/// User persistence adapter over the shared connection pool.
pub struct DieselUserRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselUserRepository {
    /// Create a repository backed by `pool`, stamping invitation expiry
    /// from `clock`.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create_with_invitation(
        &self,
        user: &NewUser,
        token_hash: &str,
        ttl: Duration,
    ) -> Result<User, StoreError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| StoreError::query("invitation ttl out of range"))?;
        let expires_at = self.clock.utc() + ttl;

        bounded("users.create_with_invitation", composite_budget(2), async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let row = conn
                .transaction(|conn| {
                    async move {
                        let new_user = NewUserRow {
                            username: &user.username,
                            email: &user.email,
                            password_hash: &user.password_hash,
                            role_id: user.role_id,
                        };
                        let row: UserRow = diesel::insert_into(users::table)
                            .values(&new_user)
                            .returning(UserRow::as_returning())
                            .get_result(conn)
                            .await?;

                        let invitation = NewInvitationRow {
                            token_hash,
                            user_id: row.id,
                            expires_at,
                        };
                        diesel::insert_into(invitations::table)
                            .values(&invitation)
                            .execute(conn)
                            .await?;

                        Ok::<_, diesel::result::Error>(row)
                    }
                    .scope_boxed()
                })
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn activate(&self, token_hash: &str) -> Result<(), StoreError> {
        let now = self.clock.utc();

        // Three statements: invitation lookup, user update, invitation
        // delete. The budget covers all of them.
        bounded("users.activate", composite_budget(3), async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            conn.transaction(|conn| {
                async move {
                    // Expired invitations are indistinguishable from absent
                    // ones; both surface as NotFound.
                    let user_id: i64 = invitations::table
                        .filter(invitations::token_hash.eq(token_hash))
                        .filter(invitations::expires_at.gt(now))
                        .select(invitations::user_id)
                        .get_result(conn)
                        .await?;

                    diesel::update(users::table.find(user_id))
                        .set(users::is_active.eq(true))
                        .execute(conn)
                        .await?;

                    diesel::delete(
                        invitations::table.filter(invitations::token_hash.eq(token_hash)),
                    )
                    .execute(conn)
                    .await?;

                    Ok::<_, diesel::result::Error>(())
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        bounded("users.delete", composite_budget(2), async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            conn.transaction(|conn| {
                async move {
                    diesel::delete(invitations::table.filter(invitations::user_id.eq(id)))
                        .execute(conn)
                        .await?;

                    let affected = diesel::delete(users::table.find(id)).execute(conn).await?;
                    if affected == 0 {
                        return Err(diesel::result::Error::NotFound);
                    }

                    Ok(())
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        bounded("users.find_by_id", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let row: UserRow = users::table
                .find(id)
                .filter(users::is_active.eq(true))
                .select(UserRow::as_select())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        bounded("users.find_by_email", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let row: UserRow = users::table
                .filter(users::email.eq(email))
                .filter(users::is_active.eq(true))
                .select(UserRow::as_select())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn follow(&self, user_id: i64, follower_id: i64) -> Result<(), StoreError> {
        bounded("users.follow", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let edge = NewFollowerRow {
                user_id,
                follower_id,
            };
            diesel::insert_into(followers::table)
                .values(&edge)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(())
        })
        .await
    }

    async fn unfollow(&self, user_id: i64, follower_id: i64) -> Result<(), StoreError> {
        bounded("users.unfollow", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let affected = diesel::delete(
                followers::table
                    .filter(followers::user_id.eq(user_id))
                    .filter(followers::follower_id.eq(follower_id)),
            )
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

            require_affected_rows(affected)
        })
        .await
    }
}
