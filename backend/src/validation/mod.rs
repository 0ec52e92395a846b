//! Input validation for credential payloads and video requests.
//!
//! Credential payloads use `validator` derive rules; video requests are
//! checked against the configured identifier and language patterns.

pub mod rules;
pub mod video;

pub use video::{InvalidVideoRequest, VideoRequestValidator};
