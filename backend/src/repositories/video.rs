//! Stored transcriptions, keyed by external id and language.

use async_trait::async_trait;
use sqlx::PgPool;

use super::common::RepositoryError;
use crate::models::video::{Transcript, Video, VideoRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Stores a transcript, replacing any earlier one for the same request.
    async fn create(
        &self,
        request: &VideoRequest,
        transcript: &Transcript,
    ) -> Result<Video, RepositoryError>;

    async fn read(&self, request: &VideoRequest) -> Result<Option<Video>, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create(
        &self,
        request: &VideoRequest,
        transcript: &Transcript,
    ) -> Result<Video, RepositoryError> {
        // Concurrent first requests for one video race here; the upsert lets both win.
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (video_id, language, title, transcription)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (video_id, language)
            DO UPDATE SET title = EXCLUDED.title, transcription = EXCLUDED.transcription
            RETURNING id, video_id, language, title, transcription, created_at
            "#,
        )
        .bind(&request.video_id)
        .bind(&request.language)
        .bind(&transcript.title)
        .bind(&transcript.transcription)
        .fetch_one(&self.pool)
        .await?;
        Ok(video)
    }

    async fn read(&self, request: &VideoRequest) -> Result<Option<Video>, RepositoryError> {
        let video = sqlx::query_as::<_, Video>(
            "SELECT id, video_id, language, title, transcription, created_at \
             FROM videos WHERE video_id = $1 AND language = $2",
        )
        .bind(&request.video_id)
        .bind(&request.language)
        .fetch_optional(&self.pool)
        .await?;
        Ok(video)
    }
}
