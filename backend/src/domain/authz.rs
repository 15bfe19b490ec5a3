//! Capability checks layered above the repositories.
//!
//! Authorization is a cross-cutting concern: it compares the actor's role
//! level against the level a mutation requires, with resource ownership as
//! an unconditional grant. It deliberately knows nothing about storage
//! errors.

use crate::domain::Error;

/// Decide whether `actor_id` may mutate a resource owned by `owner_id`.
///
/// Owners may always act on their own resources. Anyone else needs a role
/// level of at least `required_level`.
pub fn is_permitted(actor_id: i64, actor_level: i32, owner_id: i64, required_level: i32) -> bool {
    actor_id == owner_id || actor_level >= required_level
}

/// [`is_permitted`] as a guard clause producing a `Forbidden` error.
pub fn require_permission(
    actor_id: i64,
    actor_level: i32,
    owner_id: i64,
    required_level: i32,
) -> Result<(), Error> {
    if is_permitted(actor_id, actor_level, owner_id, required_level) {
        Ok(())
    } else {
        Err(Error::forbidden("insufficient role level"))
    }
}
