//! Process startup: database pool, adapters, router and the HTTP listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::adapters::auth::{FirebaseIdentityProvider, FirebaseSessionValidator, FirebaseTokenConfig};
use crate::adapters::http::{api_router, ApiDependencies};
use crate::adapters::postgres::{
    PostgresAppointmentRepository, PostgresDoctorRepository, PostgresSlotRepository,
    PostgresUserRepository, MIGRATOR,
};
use crate::config::{AppConfig, ConfigError, DatabaseConfig, ServerConfig};
use crate::domain::foundation::{AuthError, IdentityError};

/// Failures that stop the service from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Identity provider setup failed: {0}")]
    Identity(#[from] IdentityError),

    #[error("Token validator setup failed: {0}")]
    TokenValidator(#[from] AuthError),

    #[error("Invalid CORS origin '{0}'")]
    InvalidCorsOrigin(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the PostgreSQL pool from configuration.
pub async fn create_pool(database: &DatabaseConfig) -> Result<PgPool, StartupError> {
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;

    info!(
        host = database.host().unwrap_or("unknown"),
        max_connections = database.max_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Wires the Postgres repositories and Firebase adapters into the API router.
pub fn build_dependencies(
    config: &AppConfig,
    pool: PgPool,
) -> Result<ApiDependencies, StartupError> {
    let identity = FirebaseIdentityProvider::from_config(&config.auth)?;
    let sessions = FirebaseSessionValidator::new(FirebaseTokenConfig::from(&config.auth))?;

    Ok(ApiDependencies {
        users: Arc::new(PostgresUserRepository::new(
            pool.clone(),
            config.features.release_slot_on_cancel,
        )),
        doctors: Arc::new(PostgresDoctorRepository::new(pool.clone())),
        slots: Arc::new(PostgresSlotRepository::new(pool.clone())),
        appointments: Arc::new(PostgresAppointmentRepository::new(
            pool,
            config.features.release_slot_on_cancel,
        )),
        identity: Arc::new(identity),
        sessions: Arc::new(sessions),
        secure_cookies: config.server.is_production(),
    })
}

/// CORS for the configured origins. Credentials are allowed so the session
/// cookie travels with cross-origin requests, which rules out wildcards.
pub fn build_cors(server: &ServerConfig) -> Result<CorsLayer, StartupError> {
    let origins = server
        .cors_origins_list()
        .into_iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| StartupError::InvalidCorsOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]))
}

/// Adds CORS, request tracing and the per-request timeout.
pub fn build_app(router: Router, server: &ServerConfig) -> Result<Router, StartupError> {
    let cors = build_cors(server)?;
    Ok(router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Runs the service until Ctrl-C or SIGTERM.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    let addr = config.server.socket_addr().map_err(ConfigError::from)?;

    let pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        MIGRATOR.run(&pool).await?;
        info!("Database migrations applied");
    }

    let deps = build_dependencies(&config, pool)?;
    let app = build_app(api_router(deps), &config.server)?;

    serve(app, addr).await?;
    info!("doctor-visit shut down gracefully");
    Ok(())
}

async fn serve(app: Router, addr: SocketAddr) -> Result<(), StartupError> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
