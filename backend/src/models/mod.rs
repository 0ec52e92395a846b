//! Data models shared across database access and API handlers.

pub mod identity;
pub mod user;
pub mod video;
