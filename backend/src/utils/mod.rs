pub mod cookies;
pub mod jwt;
pub mod password;

pub use jwt::{Token, TokenError, TokenKind, TokenManager, ACCESS_TTL, REFRESH_TTL};
pub use password::{Argon2Hasher, PasswordHasher};
