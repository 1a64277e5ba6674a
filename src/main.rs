//! UniEvent backend
//!
//! Main application entry point

use std::sync::Arc;

use tracing::info;

use unievent::config::Settings;
use unievent::database::{create_pool, run_migrations, DatabaseService, PoolConfig};
use unievent::handlers::{router, AppState};
use unievent::services::{AuthService, CatalogService};
use unievent::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment first so UNIEVENT__ overrides from .env are visible to
    // the config loader.
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on drop
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting UniEvent backend...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&PoolConfig::from_settings(&settings.database)).await?;

    // Run database migrations
    run_migrations(&pool).await?;

    // Build the store, warm the catalog cache and sync admin roles
    let store = Arc::new(DatabaseService::new(pool));
    let catalog = CatalogService::load(Arc::clone(&store)).await?;
    let auth = AuthService::new(Arc::clone(&store), &settings.auth);
    auth.sync_admin_roles().await?;

    let state = AppState {
        catalog: Arc::new(catalog),
        auth: Arc::new(auth),
    };
    let app = router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("UniEvent listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("UniEvent backend has been shut down.");
    Ok(())
}

/// Resolve when the process should stop accepting connections. In-flight
/// requests drain before `axum::serve` returns.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
