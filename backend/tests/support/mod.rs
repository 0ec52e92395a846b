#![allow(dead_code)]
use std::sync::{
    atomic::{AtomicI64, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use transcribify_backend::{
    config::{DEFAULT_LANGUAGE_PATTERN, DEFAULT_VIDEO_ID_PATTERN},
    models::{
        user::{NewUser, User, UserRole},
        video::{Video, VideoRequest},
    },
    repositories::{RepositoryError, UserRepository},
    router,
    services::{Finder, FinderError},
    state::AppState,
    types::{UserId, VideoId},
    utils::{cookies::CookieOptions, jwt::TokenManager, PasswordHasher},
    validation::VideoRequestValidator,
};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Stores hashes as `plain:<password>`; Argon2 is covered by unit tests.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> anyhow::Result<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    history: Mutex<Vec<(UserId, Video)>>,
    next_id: AtomicI64,
    fail_put_user_video: bool,
    /// Every video the finder hands out, so history can resolve ids.
    catalog: Mutex<Vec<Video>>,
}

impl InMemoryUserRepository {
    pub fn failing_history_writes() -> Self {
        Self {
            fail_put_user_video: true,
            ..Self::default()
        }
    }

    pub fn register(&self, video: Video) {
        self.catalog.lock().unwrap().push(video);
    }

    pub fn history_len(&self, user_id: UserId) -> usize {
        self.history
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| *owner == user_id)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.username == user.username) {
            return Err(RepositoryError::Duplicate("users_username_key".into()));
        }
        let created = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn put_user_video(
        &self,
        user_id: UserId,
        video_id: VideoId,
    ) -> Result<(), RepositoryError> {
        if self.fail_put_user_video {
            return Err(RepositoryError::Database(sqlx::Error::PoolClosed));
        }
        let video = self
            .catalog
            .lock()
            .unwrap()
            .iter()
            .find(|video| video.id == video_id)
            .cloned()
            .ok_or(RepositoryError::Database(sqlx::Error::RowNotFound))?;
        self.history.lock().unwrap().push((user_id, video));
        Ok(())
    }

    async fn get_user_videos(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Video>, RepositoryError> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, video)| video.clone())
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }
}

/// Finder that answers every request with a synthesized video, or fails.
pub struct StubFinder {
    users: Arc<InMemoryUserRepository>,
    calls: AtomicUsize,
    fail: bool,
}

impl StubFinder {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            fail: true,
            ..Self::new(users)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Finder for StubFinder {
    async fn find(&self, request: &VideoRequest) -> Result<Video, FinderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
        if self.fail {
            return Err(FinderError::Upstream(502));
        }
        let video = Video {
            id: VideoId::new(100 + call),
            video_id: request.video_id.clone(),
            language: request.language.clone(),
            title: format!("Title of {}", request.video_id),
            transcription: format!("Transcript of {} in {}", request.video_id, request.language),
            created_at: Utc::now(),
        };
        self.users.register(video.clone());
        Ok(video)
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub finder: Arc<StubFinder>,
    pub tokens: Arc<TokenManager>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let finder = Arc::new(StubFinder::new(users.clone()));
        Self::with(users, finder)
    }

    pub fn with(users: Arc<InMemoryUserRepository>, finder: Arc<StubFinder>) -> Self {
        let tokens = Arc::new(TokenManager::new(TEST_SECRET).expect("token manager"));
        let validator = VideoRequestValidator::new(DEFAULT_VIDEO_ID_PATTERN, DEFAULT_LANGUAGE_PATTERN)
            .expect("default patterns compile");
        let state = AppState::new(
            tokens.clone(),
            users.clone(),
            finder.clone(),
            Arc::new(PlainHasher),
            validator,
            CookieOptions::default(),
        );
        Self {
            router: router(state),
            users,
            finder,
            tokens,
        }
    }

    /// Creates a stored user and returns it with a valid access token.
    pub async fn seed_user(&self, username: &str) -> (User, String) {
        let user = self
            .users
            .create(NewUser {
                username: username.into(),
                password_hash: PlainHasher.hash("correct-horse").unwrap(),
                role: UserRole::User,
            })
            .await
            .expect("seed user");
        let token = self
            .tokens
            .issue(&user, transcribify_backend::utils::ACCESS_TTL)
            .expect("issue token");
        (user, token.value)
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
