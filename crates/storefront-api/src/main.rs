//! storefront-api server binary.

use std::net::SocketAddr;

use storefront_api::{app, logging::init_tracing, AppState, ServerConfig};
use storefront_db::{log_pool_metrics, Database};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();
    let _log_guard = init_tracing(&config.log);

    for warning in &config.warnings {
        warn!(subsystem = "config", "{}", warning);
    }

    info!(
        subsystem = "api",
        max_connections = config.db_max_connections,
        run_migrations = config.run_migrations,
        seed_database = config.seed_database,
        "Connecting to database"
    );
    let db = Database::connect(&config.database_url, &config.pool_config()).await?;

    if config.run_migrations {
        db.migrate().await?;
        info!(subsystem = "api", "Migrations applied");
    }

    if config.seed_database && db.seed_if_empty().await? {
        info!(subsystem = "api", "Seeded demo catalog");
    }

    log_pool_metrics(db.pool());

    let router = app(AppState::from_database(&db), &config);

    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
