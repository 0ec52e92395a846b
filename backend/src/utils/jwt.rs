use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::{User, UserRole};
use crate::types::UserId;

/// Lifetime of an access token.
pub const ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
/// Lifetime of a refresh token.
pub const REFRESH_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Classifies a lifetime; only the two canonical lifetimes have a kind.
    pub fn from_ttl(ttl: Duration) -> Option<Self> {
        match ttl {
            ACCESS_TTL => Some(TokenKind::Access),
            REFRESH_TTL => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

/// A signed token as handed to clients. Nothing about it is stored server-side.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub value: String,
    /// `None` when the token was issued with a non-canonical lifetime.
    pub kind: Option<TokenKind>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub exp: i64, // unix seconds
    pub role: UserRole,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing key must not be empty")]
    EmptyKey,
    #[error("token lifetime is out of range")]
    InvalidTtl,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token signed with unexpected algorithm {0:?}")]
    UnexpectedAlgorithm(Algorithm),
    #[error("token signature does not match")]
    SignatureMismatch,
    #[error("token claims are missing or malformed")]
    ClaimsMissing,
    #[error("token is invalid or expired")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 identity tokens with a single symmetric key.
///
/// The key is injected once at construction and never read from the
/// environment afterwards. The manager holds no per-request state and is
/// shared behind an `Arc`.
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(signing_key: &str) -> Result<Self, TokenError> {
        if signing_key.is_empty() {
            return Err(TokenError::EmptyKey);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(signing_key.as_bytes()),
            decoding: DecodingKey::from_secret(signing_key.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, user: &User, ttl: Duration) -> Result<Token, TokenError> {
        let lifetime = chrono::Duration::from_std(ttl).map_err(|_| TokenError::InvalidTtl)?;
        let expires_at = Utc::now()
            .checked_add_signed(lifetime)
            .ok_or(TokenError::InvalidTtl)?;

        let claims = Claims {
            sub: user.id,
            exp: expires_at.timestamp(),
            role: user.role,
        };
        let value = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;

        Ok(Token {
            value,
            kind: TokenKind::from_ttl(ttl),
            expires_at,
        })
    }

    /// Verifies a token and returns its subject.
    pub fn verify(&self, value: &str) -> Result<UserId, TokenError> {
        self.decode_claims(value).map(|claims| claims.sub)
    }

    pub fn decode_claims(&self, value: &str) -> Result<Claims, TokenError> {
        // Reject foreign algorithms before the key is involved at all.
        let header = decode_header(value).map_err(TokenError::InvalidToken)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnexpectedAlgorithm(header.alg));
        }

        decode::<Claims>(value, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
        ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::ClaimsMissing,
        _ => TokenError::InvalidToken(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id: UserId::new(id),
            username: "bob".into(),
            password_hash: "hash".into(),
            role,
            created_at: Utc::now(),
        }
    }

    fn sign(claims: serde_json::Value, alg: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode token")
    }

    fn future_exp() -> i64 {
        Utc::now().timestamp() + 600
    }

    #[test]
    fn issue_and_verify_returns_subject() {
        let manager = TokenManager::new("secret").unwrap();
        for id in [0, 1, 42, i64::MAX] {
            let token = manager.issue(&user(id, UserRole::Admin), ACCESS_TTL).unwrap();
            assert_eq!(manager.verify(&token.value).unwrap(), UserId::new(id));
        }
    }

    #[test]
    fn issued_claims_carry_role_and_expiry() {
        let manager = TokenManager::new("secret").unwrap();
        let token = manager.issue(&user(7, UserRole::Admin), REFRESH_TTL).unwrap();
        let claims = manager.decode_claims(&token.value).unwrap();
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp, token.expires_at.timestamp());
    }

    #[test]
    fn kind_follows_lifetime() {
        let manager = TokenManager::new("secret").unwrap();
        let u = user(1, UserRole::User);
        assert_eq!(manager.issue(&u, ACCESS_TTL).unwrap().kind, Some(TokenKind::Access));
        assert_eq!(manager.issue(&u, REFRESH_TTL).unwrap().kind, Some(TokenKind::Refresh));
        assert_eq!(manager.issue(&u, Duration::from_secs(60)).unwrap().kind, None);
    }

    #[test]
    fn expires_at_matches_lifetime() {
        let manager = TokenManager::new("secret").unwrap();
        let before = Utc::now();
        let token = manager.issue(&user(1, UserRole::User), ACCESS_TTL).unwrap();
        let delta = (token.expires_at - before).num_seconds();
        assert!((899..=901).contains(&delta), "delta was {delta}");
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(TokenManager::new(""), Err(TokenError::EmptyKey)));
    }

    #[test]
    fn token_from_other_key_is_a_signature_mismatch() {
        let issuer = TokenManager::new("secret-a").unwrap();
        let verifier = TokenManager::new("secret-b").unwrap();
        let token = issuer.issue(&user(1, UserRole::User), ACCESS_TTL).unwrap();
        assert!(matches!(
            verifier.verify(&token.value),
            Err(TokenError::SignatureMismatch)
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        let manager = TokenManager::new("secret").unwrap();
        let token = sign(
            json!({ "sub": 1, "exp": Utc::now().timestamp() - 5, "role": "user" }),
            Algorithm::HS256,
            "secret",
        );
        assert!(matches!(
            manager.verify(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn other_hmac_algorithm_is_rejected_before_verification() {
        let manager = TokenManager::new("secret").unwrap();
        let token = sign(
            json!({ "sub": 1, "exp": future_exp(), "role": "user" }),
            Algorithm::HS512,
            "secret",
        );
        assert!(matches!(
            manager.verify(&token),
            Err(TokenError::UnexpectedAlgorithm(Algorithm::HS512))
        ));
    }

    #[test]
    fn non_numeric_subject_is_claims_missing() {
        let manager = TokenManager::new("secret").unwrap();
        let token = sign(
            json!({ "sub": "user-1", "exp": future_exp(), "role": "user" }),
            Algorithm::HS256,
            "secret",
        );
        assert!(matches!(manager.verify(&token), Err(TokenError::ClaimsMissing)));
    }

    #[test]
    fn missing_subject_is_claims_missing() {
        let manager = TokenManager::new("secret").unwrap();
        let token = sign(
            json!({ "exp": future_exp(), "role": "user" }),
            Algorithm::HS256,
            "secret",
        );
        assert!(matches!(manager.verify(&token), Err(TokenError::ClaimsMissing)));
    }

    #[test]
    fn garbage_is_invalid() {
        let manager = TokenManager::new("secret").unwrap();
        assert!(matches!(
            manager.verify("not-a-token"),
            Err(TokenError::InvalidToken(_))
        ));
    }
}
