//! Backend library modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Admission-control middleware applied in front of every route.
pub use middleware::rate_limit::RateLimit;
