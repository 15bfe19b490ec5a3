//! Port abstraction for role reference data.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::role::Role;

/// Read-only access to the roles table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Fetch a role by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Role, StoreError>;

    /// Fetch a role by identifier.
    async fn find_by_id(&self, id: i64) -> Result<Role, StoreError>;
}
