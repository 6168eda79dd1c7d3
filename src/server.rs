//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, migrations, service wiring, the click worker
//! and the Axum server lifecycle.

use crate::application::click_worker::{ClickRecorder, run_click_worker};
use crate::application::services::TokenService;
use crate::config::Config;
use crate::infrastructure::geo::{GeoLocator, IpApiLocator, NullLocator};
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgRefreshTokenRepository, PgUserRepository,
};
use crate::routes::{app_router, cors_layer};
use crate::state::{AppState, Repositories};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long in-flight clicks may take to finish after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Opens the connection pool with the configured limits.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Token service and country lookup
/// - Background click worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let repos = Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        refresh_tokens: Arc::new(PgRefreshTokenRepository::new(pool.clone())),
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        clicks: Arc::new(PgClickRepository::new(pool.clone())),
    };

    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.jwt_refresh_secret.as_bytes(),
        chrono::Duration::minutes(config.access_token_ttl_minutes),
        chrono::Duration::days(config.refresh_token_ttl_days),
    ));

    let geo: Arc<dyn GeoLocator> = match &config.geoip_api_url {
        Some(template) => {
            tracing::info!("Country lookup enabled");
            Arc::new(IpApiLocator::new(template.clone()))
        }
        None => {
            tracing::info!("Country lookup disabled");
            Arc::new(NullLocator)
        }
    };

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let recorder = Arc::new(ClickRecorder::new(repos.clicks.clone(), geo));
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        recorder,
        config.click_worker_concurrency,
        Duration::from_secs(config.click_record_timeout_secs),
    ));
    tracing::info!(
        concurrency = config.click_worker_concurrency,
        "Click worker started"
    );

    let state = AppState::new(
        repos,
        tokens,
        &config.frontend_origin,
        click_tx,
        config.behind_proxy,
    );

    let app = app_router(state, cors_layer(&config.frontend_origin)?);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last sender, so the worker sees a closed channel.
    tracing::info!("Server stopped, draining click queue");
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker)
        .await
        .is_err()
    {
        tracing::warn!("Click worker did not finish within {WORKER_DRAIN_TIMEOUT:?}");
    }

    pool.close().await;
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
