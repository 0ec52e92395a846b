use axum::{
    extract::{rejection::RawPathParamsRejection, Query, RawPathParams, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::models::video::{LanguageQuery, VIDEO_ID_TAG};

/// Logs the video id and language of every transcription request, then the
/// status and latency once the handler has answered.
///
/// Undecodable path parameters are logged as empty and never reject the
/// request, so the handler still decides the status.
pub async fn log_video_request(
    params: Result<RawPathParams, RawPathParamsRejection>,
    request: Request,
    next: Next,
) -> Response {
    let video_id = match &params {
        Ok(params) => params
            .iter()
            .find(|(name, _)| *name == VIDEO_ID_TAG)
            .map(|(_, value)| value.to_string())
            .unwrap_or_default(),
        Err(_) => String::new(),
    };
    let language = Query::<LanguageQuery>::try_from_uri(request.uri())
        .map(|Query(query)| query.lang)
        .unwrap_or_default()
        .unwrap_or_default();
    let path = request.uri().path().to_string();

    tracing::info!(
        video_id = %video_id,
        language = %language,
        path = %path,
        "Input parameter"
    );

    let start = Instant::now();
    let response = next.run(request).await;
    tracing::debug!(
        video_id = %video_id,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Video request completed"
    );
    response
}
