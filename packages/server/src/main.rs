use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};

use server::config::AppConfig;
use server::database::init_db;
use server::seed::ensure_indexes;
use server::services::image_search::PixabayClient;
use server::services::page_cache::LruPageCache;
use server::services::protection::TokenBucketProtection;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    ensure_indexes(&db).await?;

    let protection = Arc::new(TokenBucketProtection::new(&config.protection));
    let images = Arc::new(
        PixabayClient::new(&config.pixabay).context("Failed to build image search client")?,
    );
    let pages = Arc::new(LruPageCache::new(config.cache.page_capacity));

    let addr = (config.server.host.clone(), config.server.port);

    let state = AppState {
        db,
        config,
        protection,
        images,
        pages,
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
