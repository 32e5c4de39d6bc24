use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use guestlist_api::{app, config::Config, middleware};
use persistence::{MemoryStore, RowStore, SheetsStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!("Starting Guestlist API v{}", env!("CARGO_PKG_VERSION"));

    // Build the configured store backend
    let store = build_store(&config)?;

    // Build application
    let app = app::create_app(config.clone(), store);

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_store(config: &Config) -> Result<Arc<dyn RowStore>> {
    let store: Arc<dyn RowStore> = match config.store.provider.as_str() {
        "memory" => {
            warn!("Using in-memory store; registrations do not survive restarts");
            Arc::new(MemoryStore::new())
        }
        _ => Arc::new(SheetsStore::new(&config.store.sheets())?),
    };
    Ok(store)
}
