pub mod common;
pub mod user;
pub mod video;

pub use common::RepositoryError;
pub use user::{PgUserRepository, UserRepository};
pub use video::{PgVideoRepository, VideoRepository};

#[cfg(test)]
pub use user::MockUserRepository;
#[cfg(test)]
pub use video::MockVideoRepository;
