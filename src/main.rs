use std::sync::Arc;

use hypertube_api::{
    config::Config,
    db::{
        create_pool, FilmStore, MemoryFilmStore, MemorySubtitleStore, PgFilmStore, PgSubtitleStore,
        SubtitleStore,
    },
    routes::{create_router, AppState},
    services::{Aggregator, Translator},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let (store, subtitles): (Arc<dyn FilmStore>, Arc<dyn SubtitleStore>) =
        match config.database_url.as_deref() {
            Some(database_url) => {
                let pool = create_pool(database_url).await?;
                let films = PgFilmStore::new(pool.clone());
                films.ensure_schema().await?;
                let subtitles = PgSubtitleStore::new(pool);
                subtitles.ensure_schema().await?;
                tracing::info!("Using PostgreSQL film and subtitle stores");
                (Arc::new(films), Arc::new(subtitles))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, films and subtitles are kept in memory");
                (
                    Arc::new(MemoryFilmStore::new()),
                    Arc::new(MemorySubtitleStore::new()),
                )
            }
        };

    let http_client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.provider_timeout())
        .build()?;

    let state = AppState {
        aggregator: Arc::new(Aggregator::from_config(&config, http_client.clone())),
        store,
        subtitles,
        translator: Arc::new(Translator::from_config(&config, http_client)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
