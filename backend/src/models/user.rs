//! Models that represent users, credential payloads, and role metadata.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

use crate::types::UserId;
use crate::validation::rules;

#[derive(Debug, Clone, FromRow)]
/// Database representation of a registered account.
pub struct User {
    /// Database-assigned identifier, carried as the token subject.
    pub id: UserId,
    /// Identifying credential used for login.
    pub username: String,
    /// Argon2 PHC string of the user's password.
    pub password_hash: String,
    /// Role embedded into issued tokens.
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
/// Supported user roles stored in the database.
pub enum UserRole {
    /// Regular account created through sign-up.
    #[default]
    User,
    /// Operator account; only assignable directly in the database.
    Admin,
}

impl UserRole {
    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            _ => Err(serde::de::Error::unknown_variant(&s, &["user", "admin"])),
        }
    }
}

#[derive(Clone, Deserialize, Validate)]
/// Username/password pair submitted to sign-up and login.
pub struct Credentials {
    #[validate(custom(function = "rules::validate_username"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

// Keeps passwords out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
/// Row data for a user about to be inserted; the id is assigned by the database.
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn user_role_serde_accepts_any_casing_and_emits_snake_case() {
        let u: UserRole = serde_json::from_str("\"user\"").unwrap();
        let a: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(u, UserRole::User);
        assert_eq!(a, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());

        assert_eq!(
            serde_json::to_value(UserRole::Admin).unwrap(),
            Value::String("admin".into())
        );
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let credentials = Credentials {
            username: "alice".into(),
            password: "hunter22hunter".into(),
        };
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter22hunter"));
    }

    #[test]
    fn credentials_validation_enforces_password_length() {
        let short = Credentials {
            username: "alice".into(),
            password: "short".into(),
        };
        assert!(short.validate().is_err());

        let ok = Credentials {
            username: "alice".into(),
            password: "long-enough-password".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn credentials_validation_rejects_bad_username() {
        let credentials = Credentials {
            username: "alice/../root".into(),
            password: "long-enough-password".into(),
        };
        let errors = credentials.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
    }
}
