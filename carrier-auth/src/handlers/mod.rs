//! HTTP handlers for carrier-auth.

pub mod auth;
pub mod companies;
pub mod metrics;
pub mod moderators;
pub mod users;

pub use auth::*;
