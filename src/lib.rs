pub(crate) mod controllers;
pub(crate) mod core;
pub(crate) mod routes;
pub(crate) mod token;
pub(crate) mod types;
pub(crate) mod utils;

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::config::{Args, Settings};
use crate::core::error::ConfigError as Error;
use crate::core::memory::MemoryStore;
use crate::core::state::AppState;
use crate::core::store::{CredentialStore, PgStore};

pub async fn run() -> Result<(), Error> {
    let config = Args::load()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::try_from(&config)?;

    tracing::debug!(?settings, "loaded settings");

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(database_url) => {
            Arc::new(PgStore::connect(database_url, config.max_connections).await?)
        }
        None => {
            tracing::warn!("no database_url configured, users are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, &settings)?;

    let app = routes::router::routes(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;

    tracing::info!("listening on {}:{}", config.host, config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}
