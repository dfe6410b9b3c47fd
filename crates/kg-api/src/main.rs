//! Knowledge graph memory server: tool-call API over a line-delimited graph store.

use kg_api::config::ServerConfig;
use kg_api::server::{self, AppState};
use kg_manager::KnowledgeGraphManager;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ServerConfig::from_env()?;
    let manager = KnowledgeGraphManager::open(&config.store_path);
    tracing::info!(path = %manager.store().path().display(), "using graph store");
    let app = server::router(Arc::new(AppState::new(manager)));

    tracing::info!("knowledge graph API listening on {}", config.listen);
    axum::serve(
        tokio::net::TcpListener::bind(config.listen).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
