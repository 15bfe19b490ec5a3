//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod comment_repository;
mod mailer;
mod post_repository;
mod role_repository;
mod store_error;
mod token_authenticator;
mod user_cache;
mod user_repository;

#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::CommentRepository;
#[cfg(test)]
pub use mailer::MockMailer;
pub use mailer::{InvitationEmail, MailError, Mailer};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::PostRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
pub use role_repository::RoleRepository;
pub use store_error::{ConflictRule, StoreError};
#[cfg(test)]
pub use token_authenticator::MockTokenAuthenticator;
pub use token_authenticator::{TokenAuthenticator, TokenError};
#[cfg(test)]
pub use user_cache::MockUserCache;
pub use user_cache::{CacheError, UserCache};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
