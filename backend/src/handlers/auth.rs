use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};

use crate::{
    error::AppError,
    models::{identity::Identity, user::Credentials},
    services::AuthError,
    state::AppState,
    utils::{cookies::access_cookie, jwt::Token},
};

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(credentials) = payload.map_err(malformed_body)?;
    let username = credentials.username.clone();

    // Rejected credentials and failed creation look the same to the caller.
    match state.auth.sign_up(credentials).await {
        Ok(token) => Ok(issued(&state, token)),
        Err(err) => {
            tracing::warn!(username = %username, error = ?err, "Sign-up failed");
            Err(AppError::Forbidden("Unable to create account".into()))
        }
    }
}

pub async fn log_in(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(credentials) = payload.map_err(malformed_body)?;
    let token = state
        .auth
        .log_in(credentials)
        .await
        .map_err(|_| AppError::Unauthorized)?;
    Ok(issued(&state, token))
}

/// Re-issues an access token for the caller's identity.
pub async fn get_token(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let user_id = identity.subject().ok_or(AppError::Unauthorized)?;
    match state.auth.renew(user_id).await {
        Ok(token) => Ok(issued(&state, token)),
        Err(AuthError::InvalidCredentials) => {
            tracing::info!(user_id = %user_id, "Token renewal for unknown subject");
            Err(AppError::Unauthorized)
        }
        Err(err) => Err(AppError::InternalServerError(err.into())),
    }
}

fn issued(state: &AppState, token: Token) -> Response {
    let cookie = access_cookie(&token, state.cookie);
    (AppendHeaders([(SET_COOKIE, cookie)]), Json(token)).into_response()
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Malformed credentials payload");
    AppError::UnprocessableEntity("Malformed request body".into())
}
