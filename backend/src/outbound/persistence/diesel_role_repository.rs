//! Diesel-backed implementation of the role repository port.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RoleRepository, StoreError};
use crate::domain::role::Role;

use super::error_mapping::{STORE_TIMEOUT, bounded, map_diesel_error, map_pool_error};
use super::models::RoleRow;
use super::pool::DbPool;
use super::schema::roles;

/// Read-only role lookup over the shared connection pool.
pub struct DieselRoleRepository {
    pool: DbPool,
}

impl DieselRoleRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for DieselRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Role, StoreError> {
        bounded("roles.find_by_name", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let row: RoleRow = roles::table
                .filter(roles::name.eq(name))
                .select(RoleRow::as_select())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Role, StoreError> {
        bounded("roles.find_by_id", STORE_TIMEOUT, async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;

            let row: RoleRow = roles::table
                .find(id)
                .select(RoleRow::as_select())
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            Ok(row.into())
        })
        .await
    }
}
