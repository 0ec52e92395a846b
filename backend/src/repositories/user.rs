//! User accounts and their video history.
//!
//! [`UserRepository`] is mockable with mockall; use `MockUserRepository` in
//! unit tests.

use async_trait::async_trait;
use sqlx::PgPool;

use super::common::RepositoryError;
use crate::models::user::{NewUser, User};
use crate::models::video::Video;
use crate::types::{UserId, VideoId};

const USER_COLUMNS: &str = "id, username, password_hash, LOWER(role) AS role, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user; a taken username yields [`RepositoryError::Duplicate`].
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Appends a history entry. Repeated entries for the same video are kept.
    async fn put_user_video(&self, user_id: UserId, video_id: VideoId)
        -> Result<(), RepositoryError>;

    /// Most recently requested first.
    async fn get_user_videos(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let query = format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&query)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn put_user_video(
        &self,
        user_id: UserId,
        video_id: VideoId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO user_videos (user_id, video_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_user_videos(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, RepositoryError> {
        let videos = sqlx::query_as::<_, Video>(
            r#"
            SELECT v.id, v.video_id, v.language, v.title, v.transcription, v.created_at
            FROM user_videos uv
            INNER JOIN videos v ON v.id = uv.video_id
            WHERE uv.user_id = $1
            ORDER BY uv.requested_at DESC, uv.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(videos)
    }
}
