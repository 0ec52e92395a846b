use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::utils::jwt::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl FromStr for SameSite {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" => Ok(SameSite::None),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Renders the `Set-Cookie` value carrying an issued access token.
///
/// `Max-Age` counts down to the token's own expiry so the browser drops the
/// cookie no later than the token stops verifying.
pub fn access_cookie(token: &Token, options: CookieOptions) -> String {
    access_cookie_at(token, options, Utc::now())
}

fn access_cookie_at(token: &Token, options: CookieOptions, now: DateTime<Utc>) -> String {
    let max_age = (token.expires_at - now).num_seconds().max(0);
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite={}",
        ACCESS_COOKIE_NAME,
        token.value,
        max_age,
        same_site_value(options.same_site)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn extract_cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

fn same_site_value(same_site: SameSite) -> &'static str {
    match same_site {
        SameSite::Lax => "Lax",
        SameSite::Strict => "Strict",
        SameSite::None => "None",
    }
}
