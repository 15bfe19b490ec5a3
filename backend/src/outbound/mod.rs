//! Outbound adapters: persistence, side cache, mail dispatch, and tokens.

pub mod auth;
pub mod cache;
pub mod mail;
pub mod persistence;
