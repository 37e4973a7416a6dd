//! todo-api server binary

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use todo_api::api::{create_router, AppState};
use todo_api::config::{AppConfig, LogFormat};
use todo_api::storage::{create_store, StoreConfig, TodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config)?;

    let store_config = config
        .store_config()
        .context("invalid storage configuration")?;
    let backend = match &store_config {
        StoreConfig::Postgres(_) => "postgres",
        StoreConfig::Memory => "memory",
    };

    let store: Arc<dyn TodoStore> = Arc::from(
        create_store(store_config)
            .await
            .context("failed to connect to storage")?,
    );
    tracing::info!(backend, "Storage ready");

    // The table must exist before the first request can reach a handler.
    store
        .ensure_schema()
        .await
        .context("failed to bootstrap schema")?;

    if !config.assets.dir.is_dir() {
        tracing::warn!(dir = %config.assets.dir.display(), "Asset directory not found");
    }

    let state = AppState::new(store)
        .with_service(config.server.service_name.clone())
        .with_assets_dir(config.assets.dir.clone());
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "Listening for HTTP traffic");

    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.logging.level.clone()))
        .unwrap_or_else(|_| EnvFilter::new("todo_api=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }

    Ok(())
}
