use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod llm;
pub mod repository;
pub mod service;

use crate::config::{Config, StorageBackend};
use crate::engine::ExecutionEngine;
use crate::llm::{CompletionClient, MistralClient};
use crate::repository::{GraphStore, InMemoryGraphStore, PgGraphStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trellis_orchestrator=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Trellis Orchestrator...");

    let config = Config::from_env()?;

    let store: Arc<dyn GraphStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            tracing::info!("Connecting to database...");

            let pool = db::create_pool(&config.database_url).await?;

            tracing::info!("Database connection pool created");

            db::run_migrations(&pool).await?;
            Arc::new(PgGraphStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Arc::new(InMemoryGraphStore::new())
        }
    };

    let completion: Option<Arc<dyn CompletionClient>> = match &config.completion_api_key {
        Some(key) => {
            tracing::info!(
                "LLM nodes use {} (default model {})",
                config.completion_base_url,
                config.completion_model
            );
            Some(Arc::new(MistralClient::new(
                config.completion_base_url.clone(),
                key.clone(),
            )))
        }
        None => {
            tracing::info!("MISTRAL_API_KEY not set, LLM nodes are simulated");
            None
        }
    };

    let engine = ExecutionEngine::standard(
        completion,
        config.completion_model.clone(),
        config.completion_timeout,
    );

    // Build router with all API endpoints
    let app = api::create_router(api::AppState {
        store,
        engine: Arc::new(engine),
    });

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
