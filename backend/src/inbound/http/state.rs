//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::cached_users::CachedUserReader;
use crate::domain::ports::{
    CommentRepository, PostRepository, RoleRepository, TokenAuthenticator, UserRepository,
};
use crate::domain::registration::RegistrationService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Composite account lifecycle flows.
    pub registration: RegistrationService,
    /// Cache-aside user reads.
    pub user_reader: CachedUserReader,
    /// Direct user persistence, for flows that must bypass the cache.
    pub users: Arc<dyn UserRepository>,
    /// Post persistence including the feed read model.
    pub posts: Arc<dyn PostRepository>,
    /// Comment persistence.
    pub comments: Arc<dyn CommentRepository>,
    /// Role reference data for capability checks.
    pub roles: Arc<dyn RoleRepository>,
    /// Bearer token issuance and validation.
    pub tokens: Arc<dyn TokenAuthenticator>,
}
