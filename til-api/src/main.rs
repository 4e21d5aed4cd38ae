//! # TIL API Server
//!
//! Serves the acronym API over HTTP.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment
//! 2. Open the store (PostgreSQL with migrations, or in-memory)
//! 3. Create the bootstrap admin account if absent
//! 4. Serve until Ctrl-C / SIGTERM, then drain and close the pool
//!
//! ## Usage
//!
//! ```bash
//! ADMIN_PASSWORD=change-me DATABASE_URL=postgres://localhost/til cargo run -p til-api
//! STORE_BACKEND=memory ADMIN_PASSWORD=change-me cargo run -p til-api
//! ```

use anyhow::Context;
use sqlx::PgPool;
use std::sync::Arc;
use til_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StoreBackend},
};
use til_shared::{
    db::{migrations, pool},
    services::users::UserService,
    store::{memory::MemoryStore, postgres::PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "til_api=debug,til_shared=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Opens the configured store; the pool is returned so it can be closed on
/// shutdown
async fn open_store(config: &Config) -> anyhow::Result<(Arc<dyn Store>, Option<PgPool>)> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok((Arc::new(MemoryStore::new()), None))
        }
        StoreBackend::Postgres => {
            let url = config
                .store
                .database_url
                .clone()
                .context("DATABASE_URL environment variable is required")?;

            migrations::ensure_database_exists(&url)
                .await
                .context("Failed to create database")?;

            let db = pool::create_pool(
                pool::DatabaseConfig::new(url).max_connections(config.store.max_connections),
            )
            .await
            .context("Failed to connect to database")?;

            migrations::run_migrations(&db)
                .await
                .context("Failed to run migrations")?;

            let status = migrations::get_migration_status(&db).await?;
            let stats = pool::get_pool_stats(&db);
            tracing::info!(
                applied = status.applied_migrations,
                latest = ?status.latest_version,
                connections = stats.total_connections,
                idle = stats.idle_connections,
                "Database ready"
            );

            Ok((Arc::new(PgStore::new(db.clone())), Some(db)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("TIL API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let (store, db) = open_store(&config).await?;

    UserService::new(store.clone())
        .ensure_admin(&config.admin.username, &config.admin.password)
        .await
        .context("Failed to create admin user")?;

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        pool::close_pool(db).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
