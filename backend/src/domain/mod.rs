//! Domain entities, services, and ports.
//!
//! Purpose: hold the consistency layer of the service — composite
//! registration flows, the cache-aside read path, optimistic post updates,
//! and admission control — expressed against ports so adapters stay
//! replaceable and the logic stays testable without infrastructure.

pub mod authz;
pub mod cached_users;
pub mod comment;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod ports;
pub mod post;
pub mod rate_limit;
pub mod registration;
pub mod role;
pub mod user;

pub use self::error::{Error, ErrorCode};

/// Convenient result alias for handlers and domain services.
pub type ApiResult<T> = Result<T, Error>;
