pub mod id;

pub use id::{UserId, VideoId};
