//! Backend entry-point: loads settings, prepares storage and serves the pages.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roomdesk::domain::PasswordLoginService;
use roomdesk::inbound::http::health::HealthState;
use roomdesk::inbound::http::session_config::fingerprint::key_fingerprint;
use roomdesk::inbound::http::session_config::{SessionMode, session_settings_from_process};
use roomdesk::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, run_migrations};
use roomdesk::outbound::storage::LocalDocumentStore;
use roomdesk::settings::AppSettings;

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
    let mode = SessionMode::from_in_production(settings.in_production);
    let session = session_settings_from_process(mode)
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let bind_addr = settings.bind_addr()?;
    let upload_root = settings.upload_root();
    let documents = LocalDocumentStore::open(&upload_root)?;
    info!(path = %upload_root.display(), "upload root ready");

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_document_store(Arc::new(documents));

    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_migrations(database_url).await?;
        info!(applied, "database migrations complete");
        let mut pool_config = PoolConfig::new(database_url);
        if let Some(size) = settings.db_pool_size {
            pool_config = pool_config.with_max_size(size);
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        bootstrap_admin(&settings, &pool).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}

async fn bootstrap_admin(settings: &AppSettings, pool: &DbPool) -> Result<()> {
    let Some((email, password)) = settings.admin_credentials() else {
        return Ok(());
    };
    let login = PasswordLoginService::new(Arc::new(DieselUserRepository::new(pool.clone())));
    let created = login
        .ensure_admin(email, password)
        .await
        .wrap_err("failed to create administrator")?;
    if !created {
        info!("administrator account already present");
    }
    Ok(())
}
