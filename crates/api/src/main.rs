use std::net::SocketAddr;

use cohort_core::catalog::MemoryProtocolCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cohort_api::config::ServerConfig;
use cohort_api::router::build_app_router;
use cohort_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cohort_api=debug,cohort=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let state = match config.database_url.clone() {
        Some(database_url) => {
            let pool = cohort_db::create_pool(&database_url, config.db_max_connections)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            cohort_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            cohort_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            AppState::postgres(pool, config.clone())
        }
        None => {
            let catalog = match &config.protocol_catalog_path {
                Some(path) => MemoryProtocolCatalog::from_json_file(path)
                    .await
                    .expect("Failed to load protocol catalog"),
                None => {
                    tracing::warn!("No DATABASE_URL or PROTOCOL_CATALOG_PATH set; catalog is empty");
                    MemoryProtocolCatalog::new()
                }
            };
            tracing::info!("Using in-memory scope store");
            AppState::in_memory(catalog, config.clone())
        }
    };
    let storage = state.storage.clone();

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, storage = storage.name(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if let cohort_api::state::StorageBackend::Postgres(pool) = storage {
        let grace = std::time::Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(grace, pool.close()).await.is_err() {
            tracing::warn!("Timed out closing database pool");
        }
        tracing::info!("Database pool closed");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
