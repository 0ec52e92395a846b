//! Resolves video requests to stored transcriptions.
//!
//! [`TranscriptFinder`] consults the video store first and only reaches out
//! to the transcription provider on a miss. Time bounds for the provider call
//! live in the HTTP client, not in callers.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::video::{Transcript, Video, VideoRequest, LANGUAGE_TAG};
use crate::repositories::{RepositoryError, VideoRepository};

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("no transcription available for {video_id} ({language})")]
    NotAvailable { video_id: String, language: String },
    #[error("transcription provider responded with status {0}")]
    Upstream(u16),
    #[error("transcription provider request failed")]
    Transport(#[from] reqwest::Error),
    #[error("video store failed")]
    Store(#[from] RepositoryError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Finder: Send + Sync {
    async fn find(&self, request: &VideoRequest) -> Result<Video, FinderError>;
}

/// HTTP client for the transcription provider.
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    http: reqwest::Client,
    base_url: String,
}

impl TranscriptClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `GET {base}/transcripts/{video_id}?lang={language}`.
    pub async fn fetch(&self, request: &VideoRequest) -> Result<Transcript, FinderError> {
        let url = format!("{}/transcripts/{}", self.base_url, request.video_id);
        let response = self
            .http
            .get(url)
            .query(&[(LANGUAGE_TAG, request.language.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(FinderError::NotAvailable {
                video_id: request.video_id.clone(),
                language: request.language.clone(),
            }),
            status if !status.is_success() => Err(FinderError::Upstream(status.as_u16())),
            _ => Ok(response.json::<Transcript>().await?),
        }
    }
}

pub struct TranscriptFinder {
    client: TranscriptClient,
    videos: Arc<dyn VideoRepository>,
}

impl TranscriptFinder {
    pub fn new(client: TranscriptClient, videos: Arc<dyn VideoRepository>) -> Self {
        Self { client, videos }
    }
}

#[async_trait]
impl Finder for TranscriptFinder {
    async fn find(&self, request: &VideoRequest) -> Result<Video, FinderError> {
        if let Some(video) = self.videos.read(request).await? {
            tracing::debug!(
                video_id = %request.video_id,
                language = %request.language,
                "Serving stored transcription"
            );
            return Ok(video);
        }

        let transcript = self.client.fetch(request).await?;
        let video = self.videos.create(request, &transcript).await?;
        tracing::info!(
            video_id = %request.video_id,
            language = %request.language,
            id = %video.id,
            "Stored new transcription"
        );
        Ok(video)
    }
}
