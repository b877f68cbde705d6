use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nexttrack_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache, CacheStore, CacheWriterHandle, MemoryStore, RedisStore},
};

/// How often the in-memory cache drops expired entries
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()?;

    let config = Config::from_env()?;

    let (store, writer) = create_cache_store(&config)?;
    let cache = Cache::new(store, config.cache_ttl());
    let state = AppState::from_config(&config, cache)?;

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(writer) = writer {
        writer.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Redis when `REDIS_URL` is set, otherwise an in-process store with a sweeper
fn create_cache_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheStore>, Option<CacheWriterHandle>)> {
    match config.redis_url.as_deref() {
        Some(url) => {
            let (store, writer) = RedisStore::new(create_redis_client(url)?);
            let store: Arc<dyn CacheStore> = Arc::new(store);
            tracing::info!("Using Redis cache");
            Ok((store, Some(writer)))
        }
        None => {
            let memory = Arc::new(MemoryStore::new());
            let sweeper = Arc::clone(&memory);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(PURGE_INTERVAL);
                loop {
                    interval.tick().await;
                    let purged = sweeper.purge_expired().await;
                    if purged > 0 {
                        tracing::debug!(purged, "Expired cache entries purged");
                    }
                }
            });
            let store: Arc<dyn CacheStore> = memory;
            tracing::info!("Using in-memory cache");
            Ok((store, None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, initiating graceful shutdown");
}
