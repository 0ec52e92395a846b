use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{
        identity::Identity,
        video::{LanguageQuery, Video, VideoRequest},
    },
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// `GET /videos/{id}?lang=`. Unparsable path or query values fall through to
/// the validator as empty strings so an anonymous caller still gets 401.
pub async fn get_video_transcription(
    State(state): State<AppState>,
    identity: Identity,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LanguageQuery>, QueryRejection>,
) -> Result<Json<Video>, AppError> {
    let video_id = path.map(|Path(id)| id).unwrap_or_default();
    let language = query
        .map(|Query(query)| query.lang)
        .unwrap_or_default()
        .unwrap_or_default();

    let video = state
        .transcriptions
        .transcribe(identity, VideoRequest::new(video_id, language))
        .await?;
    Ok(Json(video))
}

pub async fn get_user_videos(
    State(state): State<AppState>,
    identity: Identity,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<Video>>, AppError> {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let videos = state
        .transcriptions
        .history(identity, query.limit.as_deref(), query.page.as_deref())
        .await?;
    Ok(Json(videos))
}
