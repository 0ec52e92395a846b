use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    models::identity::Identity,
    state::AppState,
    utils::cookies::{extract_cookie_value, ACCESS_COOKIE_NAME},
};

/// Establishes the request's [`Identity`] from a bearer token or the access
/// cookie.
///
/// The gate never rejects on its own: requests without a usable token
/// continue as [`Identity::Anonymous`] and protected handlers answer 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match extract_token(request.headers()) {
        None => Identity::Anonymous,
        Some(token) => match state.tokens.verify(&token) {
            Ok(user_id) => Identity::Subject(user_id),
            Err(err) => {
                tracing::debug!(error = %err, path = %request.uri().path(), "Rejected token");
                Identity::Anonymous
            }
        },
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Identity>()
            .copied()
            .unwrap_or_default())
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token);
    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| extract_cookie_value(raw, ACCESS_COOKIE_NAME))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}
