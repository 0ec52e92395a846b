use regex::Regex;
use thiserror::Error;

use crate::models::video::VideoRequest;

/// Why a video request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidVideoRequest {
    #[error("video id {0:?} does not match the accepted pattern")]
    VideoId(String),
    #[error("language {0:?} does not match the accepted pattern")]
    Language(String),
}

/// Pattern checks for the identifier and language of a video request.
///
/// Patterns are compiled once at startup and always applied to the whole
/// field, so a configured pattern without anchors cannot accept a value that
/// merely contains a valid substring.
#[derive(Debug, Clone)]
pub struct VideoRequestValidator {
    video_id: Regex,
    language: Regex,
}

impl VideoRequestValidator {
    pub fn new(video_id_pattern: &str, language_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            video_id: anchored(video_id_pattern)?,
            language: anchored(language_pattern)?,
        })
    }

    pub fn validate(&self, request: &VideoRequest) -> Result<(), InvalidVideoRequest> {
        if !self.video_id.is_match(&request.video_id) {
            return Err(InvalidVideoRequest::VideoId(request.video_id.clone()));
        }
        if !self.language.is_match(&request.language) {
            return Err(InvalidVideoRequest::Language(request.language.clone()));
        }
        Ok(())
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}
