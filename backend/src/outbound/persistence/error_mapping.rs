//! Classification of store failures into the repository error taxonomy.
//!
//! Driver errors are interpreted exactly once, here. Unique violations are
//! distinguished by constraint name so callers learn which rule they
//! broke; everything unrecognized collapses into an opaque error whose
//! driver detail reaches logs, never callers.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::ports::{ConflictRule, StoreError};

use super::pool::PoolError;

/// Budget for one repository call against the store.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Budget for a composite flow of `steps` store statements: the sum of
/// the individual step budgets, so a flow never aborts while every one
/// of its statements is still within its own allowance.
pub const fn composite_budget(steps: u32) -> Duration {
    Duration::from_secs(STORE_TIMEOUT.as_secs() * steps as u64)
}

/// Map pool checkout failures to the repository taxonomy.
pub fn map_pool_error(error: PoolError) -> StoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    StoreError::unavailable(message)
}

/// Classify a unique-constraint violation by the constraint that fired.
///
/// Unrecognized constraints are logged for monitoring; they may indicate
/// new schema constraints that need explicit mapping.
pub fn classify_unique_violation(constraint_name: Option<&str>, message: &str) -> StoreError {
    match constraint_name {
        Some(name) if name.contains("users_email") => {
            StoreError::Conflict(ConflictRule::DuplicateEmail)
        }
        Some(name) if name.contains("users_username") => {
            StoreError::Conflict(ConflictRule::DuplicateUsername)
        }
        Some(name) if name.contains("followers") => {
            StoreError::Conflict(ConflictRule::DuplicateFollow)
        }
        Some(name) if name.contains("invitations_user_id") => {
            // One unconsumed invitation per account; racing registrations
            // for the same identity surface as a duplicate email first.
            StoreError::Conflict(ConflictRule::DuplicateEmail)
        }
        other => {
            warn!(
                message,
                constraint_name = ?other,
                "unrecognized unique violation - may need specific error mapping"
            );
            StoreError::query("unique constraint violation")
        }
    }
}

/// Map Diesel errors to the repository taxonomy.
pub fn map_diesel_error(error: diesel::result::Error) -> StoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            classify_unique_violation(info.constraint_name(), info.message())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            // Inserting an edge or child row against a missing parent.
            StoreError::NotFound
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::unavailable("database connection error")
        }
        DieselError::DatabaseError(_, _) => StoreError::query("database error"),
        _ => StoreError::query("database error"),
    }
}

/// Turn an affected-row count into the delete/unfollow contract: zero rows
/// means the target never existed, which is `NotFound`, not success.
pub fn require_affected_rows(affected: usize) -> Result<(), StoreError> {
    if affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

/// Bound a store operation so a stalled store access fails fast instead of
/// blocking its worker indefinitely.
///
/// Composite flows pass a multiple of [`STORE_TIMEOUT`] at least as large
/// as the sum of their steps' budgets.
pub async fn bounded<T, F>(operation: &str, budget: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_elapsed) => {
            warn!(operation, budget_secs = budget.as_secs(), "store operation timed out");
            Err(StoreError::unavailable("store operation timed out"))
        }
    }
}
