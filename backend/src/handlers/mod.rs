pub mod auth;
pub mod videos;

pub use auth::*;
pub use videos::*;
