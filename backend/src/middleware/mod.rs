//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such
//! as admission control.

pub mod rate_limit;

pub use rate_limit::RateLimit;
