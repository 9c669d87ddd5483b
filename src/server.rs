//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, database connection and migrations, and the Axum
//! server lifecycle.

use crate::config::{Config, StorageBackend, mask_connection_string};
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::persistence::{MemoryMappingRepository, PgMappingRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, HashCodeGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connection attempts made before startup fails.
const CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the mapping store (PostgreSQL with migrations, or in-memory)
/// - the code generator
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = build_repository(&config).await?;

    let generator: Arc<dyn CodeGenerator> = Arc::new(
        HashCodeGenerator::new(config.code_length).context("Invalid CODE_LENGTH")?,
    );

    let state = AppState::new(
        repository,
        generator,
        config.code_max_attempts,
        config.base_url.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_repository(config: &Config) -> Result<Arc<dyn MappingRepository>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory store; mappings are lost on restart");
            Ok(Arc::new(MemoryMappingRepository::new()))
        }
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(
                PgMappingRepository::new(Arc::new(pool))
                    .with_operation_timeout(config.store_timeout()),
            ))
        }
    }
}

/// Opens the PostgreSQL pool, retrying with exponential backoff.
///
/// # Errors
///
/// Returns the last connection error once all attempts are exhausted.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(10)
        .factor(10)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS - 1);

    let pool = Retry::start(strategy, || async {
        options
            .clone()
            .connect(&config.database_url)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    database = %mask_connection_string(&config.database_url),
                    "Database connection failed, retrying"
                );
            })
    })
    .await
    .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
