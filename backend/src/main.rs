#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! Backend entry-point: loads settings, picks the storage adapters and serves
//! the REST API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use inkpost::inbound::http::health::HealthState;
use inkpost::inbound::http::session_config::{BuildMode, session_settings_from_env};
use inkpost::outbound::persistence::{DbPool, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server};

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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("session configuration: {e}")))?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    );

    if let Some(pool_config) = settings.pool_config() {
        if settings.run_migrations {
            let applied = run_pending_migrations(pool_config.database_url().to_owned())
                .await
                .map_err(|e| std::io::Error::other(format!("run migrations: {e}")))?;
            info!(applied, "database migrations applied");
        }
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))?;
        pool.ping()
            .await
            .map_err(|e| std::io::Error::other(format!("database unreachable: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("INKPOST_DATABASE_URL not set; state is lost on restart");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "listening");
    server.await
}
