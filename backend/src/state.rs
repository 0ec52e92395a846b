use std::sync::Arc;

use anyhow::Context;

use crate::{
    config::Config,
    db::connection::DbPool,
    repositories::{PgUserRepository, PgVideoRepository, UserRepository},
    services::{AuthorizationService, Finder, TranscriptClient, TranscriptFinder, TranscriptionService},
    utils::{cookies::CookieOptions, jwt::TokenManager, password::Argon2Hasher, PasswordHasher},
    validation::VideoRequestValidator,
};

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub auth: Arc<AuthorizationService>,
    pub transcriptions: Arc<TranscriptionService>,
    pub cookie: CookieOptions,
}

impl AppState {
    /// Assembles the state from already constructed collaborators.
    pub fn new(
        tokens: Arc<TokenManager>,
        users: Arc<dyn UserRepository>,
        finder: Arc<dyn Finder>,
        hasher: Arc<dyn PasswordHasher>,
        validator: VideoRequestValidator,
        cookie: CookieOptions,
    ) -> Self {
        let auth = AuthorizationService::new(users.clone(), tokens.clone(), hasher);
        let transcriptions = TranscriptionService::new(finder, users, Arc::new(validator));
        Self {
            tokens,
            auth: Arc::new(auth),
            transcriptions: Arc::new(transcriptions),
            cookie,
        }
    }

    /// Production wiring: Postgres repositories, the HTTP transcription
    /// provider and Argon2 hashing.
    pub fn from_config(pool: DbPool, config: &Config) -> anyhow::Result<Self> {
        let tokens = TokenManager::new(&config.jwt_secret).context("Invalid JWT_SECRET")?;
        let validator =
            VideoRequestValidator::new(&config.video_id_pattern, &config.language_pattern)
                .context("Invalid video request pattern")?;

        let users = Arc::new(PgUserRepository::new(pool.clone()));
        let videos = Arc::new(PgVideoRepository::new(pool));
        let client = TranscriptClient::new(config.finder_base_url.as_str(), config.finder_timeout)
            .context("Failed to build transcription client")?;
        let finder = Arc::new(TranscriptFinder::new(client, videos));

        Ok(Self::new(
            Arc::new(tokens),
            users,
            finder,
            Arc::new(Argon2Hasher),
            validator,
            config.cookie,
        ))
    }
}
