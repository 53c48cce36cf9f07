mod config;
mod db;
mod error;
mod routes;
mod services;
mod state;
mod storage;
mod store;

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, RowStoreConfig};
use crate::state::AppState;
use crate::storage::ObjectStore;
use crate::storage::http::HttpObjectStore;
use crate::storage::memory::MemoryObjectStore;
use crate::store::RowStore;
use crate::store::memory::MemoryRowStore;
use crate::store::postgres::PgRowStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().inspect_err(|e| tracing::error!(error = %e, "invalid configuration"))?;

    let rows: Arc<dyn RowStore> = match &config.rows {
        RowStoreConfig::Postgres { database_url, max_connections } => {
            let pool = db::init_pool(database_url, *max_connections)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "database init failed"))?;
            Arc::new(PgRowStore::new(pool))
        }
        RowStoreConfig::Memory => {
            tracing::warn!("using in-memory row store; data is lost on exit");
            Arc::new(MemoryRowStore::new())
        }
    };

    let objects: Arc<dyn ObjectStore> = match &config.storage {
        Some(remote) => Arc::new(HttpObjectStore::new(remote)?),
        None => {
            tracing::warn!("STORAGE_URL not set; using in-memory object store");
            Arc::new(MemoryObjectStore::new())
        }
    };

    let state = AppState::new(rows, objects, config.buckets.clone());
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, "folio listening");
    axum::serve(listener, app).await?;
    Ok(())
}
