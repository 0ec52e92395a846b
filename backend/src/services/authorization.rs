//! Sign-up, login and token renewal.

use std::sync::Arc;

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::models::user::{Credentials, NewUser, User, UserRole};
use crate::repositories::{RepositoryError, UserRepository};
use crate::types::UserId;
use crate::utils::jwt::{Token, TokenError, TokenManager, ACCESS_TTL};
use crate::utils::password::PasswordHasher;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credentials failed validation")]
    Validation(#[from] ValidationErrors),
    #[error("failed to hash password")]
    Hash(#[source] anyhow::Error),
    #[error("failed to persist user")]
    Persistence(#[from] RepositoryError),
    #[error("failed to issue token")]
    Token(#[from] TokenError),
    /// Unknown user, wrong password, or an unverifiable stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,
}

pub struct AuthorizationService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenManager>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthorizationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenManager>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Creates a `user`-role account and issues its first access token.
    ///
    /// Nothing is issued unless every step succeeds.
    pub async fn sign_up(&self, credentials: Credentials) -> Result<Token, AuthError> {
        credentials.validate()?;

        let password_hash = self
            .hasher
            .hash(&credentials.password)
            .map_err(AuthError::Hash)?;

        let user = self
            .users
            .create(NewUser {
                username: credentials.username,
                password_hash,
                role: UserRole::User,
            })
            .await?;

        let token = self.tokens.issue(&user, ACCESS_TTL)?;
        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(token)
    }

    pub async fn log_in(&self, credentials: Credentials) -> Result<Token, AuthError> {
        let user = match self.users.find_by_username(&credentials.username).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!(username = %credentials.username, "Login for unknown user");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                tracing::error!(username = %credentials.username, error = ?err, "User lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match self.hasher.verify(&credentials.password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user_id = %user.id, "Login with wrong password");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                tracing::error!(user_id = %user.id, error = ?err, "Stored password hash unusable");
                return Err(AuthError::InvalidCredentials);
            }
        }

        self.issue_access(&user)
    }

    /// Re-issues an access token for an already authenticated subject.
    pub async fn renew(&self, user_id: UserId) -> Result<Token, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        self.issue_access(&user)
    }

    fn issue_access(&self, user: &User) -> Result<Token, AuthError> {
        let token = self.tokens.issue(user, ACCESS_TTL)?;
        tracing::info!(user_id = %user.id, "Issued access token");
        Ok(token)
    }
}
