pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Builds the HTTP surface.
///
/// Public routes sit outside the authentication gate; every protected route
/// sees an [`Identity`](models::identity::Identity) in its request extensions.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/signup", post(handlers::sign_up))
        .route("/login", post(handlers::log_in));

    let protected_routes = Router::new()
        .route(
            "/videos/{id}",
            get(handlers::get_video_transcription)
                .route_layer(axum_middleware::from_fn(middleware::log_video_request)),
        )
        .route("/videos", get(handlers::get_user_videos))
        .route("/token", get(handlers::get_token))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::authenticate,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
