//! PostgreSQL persistence adapters built on Diesel and bb8.

pub mod error_mapping;
mod models;
pub mod pool;
pub(crate) mod schema;

mod diesel_comment_repository;
mod diesel_post_repository;
mod diesel_role_repository;
mod diesel_user_repository;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_role_repository::DieselRoleRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
