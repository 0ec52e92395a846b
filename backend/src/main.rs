use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcribify_backend::{
    config::Config,
    db::connection::{create_pool, DbPool},
    router,
    state::AppState,
};

fn mask_secret(s: &str) -> String {
    if s.is_empty() {
        return "<empty>".into();
    }
    let prefix = s.chars().take(4).collect::<String>();
    format!("{}*** (len={})", prefix, s.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transcribify_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!(
        database_url = %config.database_url,
        jwt_secret = %mask_secret(&config.jwt_secret),
        finder_base_url = %config.finder_base_url,
        finder_timeout_secs = config.finder_timeout.as_secs(),
        video_id_pattern = %config.video_id_pattern,
        language_pattern = %config.language_pattern,
        "Loaded configuration from environment/.env"
    );

    let pool: DbPool = create_pool(&config.database_url, config.database_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState::from_config(pool, &config)?;
    let app = router(state);

    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
