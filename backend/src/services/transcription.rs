//! Protected video flows: transcription lookup and per-user history.
//!
//! Every step is a single attempt. The first failure ends the request and is
//! logged here with its context; callers only map the error to a status.

use std::sync::Arc;

use thiserror::Error;

use crate::models::identity::Identity;
use crate::models::video::{Video, VideoRequest};
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::finder::{Finder, FinderError};
use crate::validation::{InvalidVideoRequest, VideoRequestValidator};

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("request carries no authenticated identity")]
    Unauthorized,
    #[error(transparent)]
    InvalidRequest(#[from] InvalidVideoRequest),
    #[error("video lookup failed")]
    Lookup(#[source] FinderError),
    /// The video was found but the history entry was not written.
    #[error("failed to record video in user history")]
    Persistence(#[source] RepositoryError),
    #[error("invalid history page {0:?}")]
    InvalidOffset(String),
    #[error("failed to load user history")]
    History(#[source] RepositoryError),
}

/// Paging window for the history listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub limit: i64,
    pub offset: i64,
}

impl HistoryPage {
    /// `limit` falls back to the default when missing or unusable, while
    /// `page` must be a non-negative integer.
    pub fn parse(limit: Option<&str>, page: Option<&str>) -> Result<Self, TranscriptionError> {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .map(|limit| limit.min(MAX_HISTORY_LIMIT))
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        let raw_page = page.unwrap_or_default();
        let offset = raw_page
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|offset| *offset >= 0)
            .ok_or_else(|| TranscriptionError::InvalidOffset(raw_page.to_string()))?;

        Ok(Self { limit, offset })
    }
}

pub struct TranscriptionService {
    finder: Arc<dyn Finder>,
    users: Arc<dyn UserRepository>,
    validator: Arc<VideoRequestValidator>,
}

impl TranscriptionService {
    pub fn new(
        finder: Arc<dyn Finder>,
        users: Arc<dyn UserRepository>,
        validator: Arc<VideoRequestValidator>,
    ) -> Self {
        Self {
            finder,
            users,
            validator,
        }
    }

    /// Identity → validate → find → record in history.
    pub async fn transcribe(
        &self,
        identity: Identity,
        request: VideoRequest,
    ) -> Result<Video, TranscriptionError> {
        let Some(user_id) = identity.subject() else {
            tracing::info!(video_id = %request.video_id, "Transcription requested without identity");
            return Err(TranscriptionError::Unauthorized);
        };

        if let Err(reason) = self.validator.validate(&request) {
            tracing::info!(
                user_id = %user_id,
                video_id = %request.video_id,
                language = %request.language,
                error = %reason,
                "Invalid video request"
            );
            return Err(reason.into());
        }

        let video = self.finder.find(&request).await.map_err(|err| {
            tracing::error!(
                user_id = %user_id,
                video_id = %request.video_id,
                language = %request.language,
                error = ?err,
                "Failed to find video"
            );
            TranscriptionError::Lookup(err)
        })?;

        self.users
            .put_user_video(user_id, video.id)
            .await
            .map_err(|err| {
                tracing::error!(
                    user_id = %user_id,
                    video = %video.id,
                    error = ?err,
                    "Failed to put user video"
                );
                TranscriptionError::Persistence(err)
            })?;

        Ok(video)
    }

    pub async fn history(
        &self,
        identity: Identity,
        limit: Option<&str>,
        page: Option<&str>,
    ) -> Result<Vec<Video>, TranscriptionError> {
        let Some(user_id) = identity.subject() else {
            tracing::info!("History requested without identity");
            return Err(TranscriptionError::Unauthorized);
        };

        let window = HistoryPage::parse(limit, page).map_err(|err| {
            tracing::info!(user_id = %user_id, error = %err, "Invalid offset");
            err
        })?;

        self.users
            .get_user_videos(user_id, window.limit, window.offset)
            .await
            .map_err(|err| {
                tracing::error!(user_id = %user_id, error = ?err, "Failed to get user videos");
                TranscriptionError::History(err)
            })
    }
}
