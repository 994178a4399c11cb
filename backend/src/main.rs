//! Backend entry-point: loads settings, prepares storage and starts the HTTP
//! server.

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use tagpet::inbound::http::health::HealthState;
use tagpet::inbound::http::session_config::{BuildMode, session_settings_from_env};
use tagpet::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use tagpet::server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid session configuration: {e}")))?;
    info!(fingerprint = %session.fingerprint(), "session key loaded");

    let mut config = ServerConfig::new(session, bind_addr, settings.clone());

    if let Some(database_url) = AppSettings::present(settings.database_url.as_ref()) {
        config = config.with_db_pool(connect_database(database_url.to_owned()).await?);
    }

    #[cfg(feature = "metrics")]
    {
        let prometheus = PrometheusMetricsBuilder::new("tagpet")
            .endpoint("/metrics")
            .build()
            .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))?;
        config = config.with_metrics(prometheus);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await
}

/// Apply migrations, then open the connection pool.
async fn connect_database(database_url: String) -> std::io::Result<DbPool> {
    let migration_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;
    info!(applied, "database schema up to date");

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)
}
