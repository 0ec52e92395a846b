//! Video requests, stored transcriptions and the provider payload they come from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::VideoId;

/// Path segment carrying the external video identifier.
pub const VIDEO_ID_TAG: &str = "id";
/// Query parameter carrying the requested language.
pub const LANGUAGE_TAG: &str = "lang";

/// A transcription request as it arrives on the wire; not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub video_id: String,
    pub language: String,
}

impl VideoRequest {
    pub fn new(video_id: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            language: language.into(),
        }
    }
}

/// Query string of `GET /videos/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

/// A transcription stored in the `videos` table and rendered to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: VideoId,
    /// External identifier the transcription was requested for.
    pub video_id: String,
    pub language: String,
    pub title: String,
    pub transcription: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Body returned by the transcription provider.
pub struct Transcript {
    pub title: String,
    pub transcription: String,
}
