use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelmatch::{
    config::Config,
    routes::{create_router, AppState},
    services::{MetadataProvider, ServiceContext, TmdbClient},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reelmatch=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Catalog, features and model are loaded once and shared read-only
    let context = ServiceContext::load(&config).context("Failed to load model artifacts")?;

    let metadata: Option<Arc<dyn MetadataProvider>> = match config.tmdb_api_key() {
        Some(api_key) => {
            let client: Arc<dyn MetadataProvider> = Arc::new(TmdbClient::new(
                api_key.to_string(),
                config.tmdb_api_url.clone(),
                Duration::from_secs(config.http_timeout_secs),
            )?);
            Some(client)
        }
        None => {
            tracing::warn!("TMDB_API_KEY not set, /api/tmdb-data will be unavailable");
            None
        }
    };

    let state = AppState::new(context, metadata, config.provider_limits());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
