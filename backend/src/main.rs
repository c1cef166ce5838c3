//! Backend entry-point: loads settings, prepares persistence and serves the
//! attendance API.

mod server;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use comedor_backend::inbound::http::health::HealthState;
use comedor_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use comedor_backend::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server, spawn_token_sweep};

fn invalid_config(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
}

async fn connect(database_url: &str, settings: &AppSettings) -> std::io::Result<DbPool> {
    run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;

    let max_size = settings.db_pool_max_size().map_err(invalid_config)?;
    let pool_config = PoolConfig::new(database_url)
        .with_max_size(max_size)
        .with_min_idle(Some(max_size.min(2)));
    DbPool::new(pool_config).await.map_err(std::io::Error::other)
}

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

    let settings = AppSettings::load().map_err(invalid_config)?;
    settings.validate().map_err(invalid_config)?;

    let mut config = ServerConfig::new(
        settings.bind_addr().map_err(invalid_config)?,
        settings.frontend_base().map_err(invalid_config)?,
    )
    .with_token_policy(settings.token_policy().map_err(invalid_config)?);

    match settings.database_url() {
        Some(url) => {
            let pool = connect(url, &settings).await?;
            if let Some(sweep) = settings.token_sweep().map_err(invalid_config)? {
                let _sweep_task = spawn_token_sweep(pool.clone(), sweep);
            }
            config = config.with_db_pool(pool);
        }
        None => warn!("COMEDOR_DATABASE_URL is unset; token issuance is unavailable"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
