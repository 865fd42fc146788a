pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{CatalogError, CatalogResult};

// Export logic types
pub use logic::{
    CatalogCounts, CatalogMutations, CatalogQueries, CategoryCreation, DeleteOutcome,
    IntegrityGuard, Invalid, Submission, ValidationErrors,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use axum::serve;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppConfig, StoreBackend};

/// Connect the configured store and serve the catalog until the process stops.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    match config.database.backend {
        StoreBackend::Postgres => {
            info!("Connecting to PostgreSQL...");
            let postgres_store =
                PostgresStore::new(&config.database_url(), config.database.max_connections)
                    .await?;

            info!("Running database migrations...");
            postgres_store.migrate().await?;

            serve_store(Arc::new(postgres_store), &config).await
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; catalog data is lost on exit");
            serve_store(Arc::new(MemoryStore::new()), &config).await
        }
    }
}

async fn serve_store<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    info!("Catalog server running on http://{}/catalog/", bind_address);

    serve(listener, app).await?;

    Ok(())
}
