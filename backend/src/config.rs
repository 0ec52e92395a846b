use anyhow::{anyhow, bail, Context};
use std::{env, net::SocketAddr, time::Duration};

use crate::utils::cookies::{CookieOptions, SameSite};

pub const DEFAULT_VIDEO_ID_PATTERN: &str = r"[A-Za-z0-9_-]{1,64}";
pub const DEFAULT_LANGUAGE_PATTERN: &str = r"[a-z]{2,3}(-[A-Za-z0-9]{2,8})*";

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub finder_base_url: String,
    pub finder_timeout: Duration,
    pub video_id_pattern: String,
    pub language_pattern: String,
    pub cookie: CookieOptions,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must be set to a non-empty value");
        }

        let database_url = var("DATABASE_URL", "postgres://localhost/transcribify");

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .context("Invalid DATABASE_MAX_CONNECTIONS value")?;

        let bind_addr = var("BIND_ADDR", "0.0.0.0:3000")
            .parse()
            .context("Invalid BIND_ADDR value")?;

        let finder_base_url = var("FINDER_BASE_URL", "http://localhost:8081");

        let finder_timeout_secs: u64 = var("FINDER_TIMEOUT_SECS", "30")
            .parse()
            .context("Invalid FINDER_TIMEOUT_SECS value")?;

        let secure = var("COOKIE_SECURE", "false")
            .parse()
            .context("Invalid COOKIE_SECURE value")?;

        let same_site_name = var("COOKIE_SAME_SITE", "lax");
        let same_site: SameSite = same_site_name
            .parse()
            .map_err(|_| anyhow!("Invalid COOKIE_SAME_SITE value: {}", same_site_name))?;

        Ok(Config {
            database_url,
            database_max_connections,
            bind_addr,
            jwt_secret,
            finder_base_url,
            finder_timeout: Duration::from_secs(finder_timeout_secs),
            video_id_pattern: var("VIDEO_ID_PATTERN", DEFAULT_VIDEO_ID_PATTERN),
            language_pattern: var("LANGUAGE_PATTERN", DEFAULT_LANGUAGE_PATTERN),
            cookie: CookieOptions { secure, same_site },
        })
    }
}
