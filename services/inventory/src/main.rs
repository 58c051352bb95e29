use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::database::{DatabaseConfig, health_check, init_pool};
use inventory::{
    AppState, ProductService,
    config::{Settings, StoreBackend},
    create_router,
    store::{InMemoryProductStore, PgProductStore, ProductStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting inventory service");

    let settings = Settings::from_env()?;

    let store: Arc<dyn ProductStore> = match settings.store {
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            Arc::new(PgProductStore::new(pool))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory product store; data is lost on shutdown");
            Arc::new(InMemoryProductStore::new())
        }
    };

    let app_state = AppState::new(ProductService::new(store, settings.max_page_size));

    // Start the web server
    let app = create_router(app_state);

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Inventory service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down inventory service");
        })
        .await?;

    Ok(())
}
