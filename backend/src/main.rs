//! Backend entry-point: loads settings, prepares the store and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use hotel_booking::inbound::http::health::HealthState;
use hotel_booking::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use hotel_booking::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let mut config = ServerConfig::new(settings.bind_addr()).with_token_ttl(settings.token_ttl());

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting hotel booking server");
    let server = create_server(health_state.clone(), config)
        .wrap_err("failed to start HTTP server")?;
    let handle = server.handle();

    tokio::select! {
        result = server => result.wrap_err("server terminated with an error")?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested; draining");
            health_state.mark_draining();
            handle.stop(true).await;
        }
    }
    Ok(())
}
