//! Care+ entry point: loads settings, prepares the database, seeds the
//! administrator, and serves the REST API.

mod server;

use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use careplus::domain::{Registration, TokenPolicy};
use careplus::inbound::http::health::HealthState;
use careplus::outbound::persistence::{DbPool, run_pending_migrations};
use careplus::outbound::security::JwtTokenCodec;
use careplus::settings::{AdminSeed, AppSettings};

use server::{Accounts, ServerConfig, build_account_service, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {err}"))
}

/// Resolve the signing secret; debug builds may run without one.
fn signing_secret(settings: &AppSettings) -> io::Result<String> {
    match settings.jwt_secret() {
        Some(secret) => Ok(secret.to_owned()),
        None if cfg!(debug_assertions) => {
            warn!("jwt_secret unset; using an ephemeral secret (tokens die with the process)");
            Ok(format!(
                "{}{}",
                Uuid::new_v4().simple(),
                Uuid::new_v4().simple()
            ))
        }
        None => Err(startup_error(
            "configuration",
            "jwt_secret is required in release builds",
        )),
    }
}

async fn seed_admin(accounts: &Accounts, seed: AdminSeed<'_>) -> io::Result<()> {
    let registration = Registration::try_from_parts(seed.email, seed.password, seed.name)
        .map_err(|err| startup_error("invalid administrator settings", err))?;
    let admin = accounts
        .ensure_admin(
            registration.email(),
            registration.password(),
            registration.name(),
        )
        .await
        .map_err(|err| startup_error("failed to seed administrator", err))?;
    info!(user_id = %admin.id(), "administrator account ready");
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("careplus")
        .endpoint("/metrics")
        .build()
        .map_err(|err| startup_error("failed to configure Prometheus metrics", err))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| startup_error("failed to load settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("configuration", err))?;
    let database_url = settings
        .database_url()
        .map_err(|err| startup_error("configuration", err))?;

    if settings.run_migrations() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| startup_error("migrations failed", err))?;
    }

    let pool_config = settings
        .pool_config()
        .map_err(|err| startup_error("configuration", err))?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| startup_error("database pool", err))?;

    let secret = signing_secret(&settings)?;
    let config = ServerConfig::new(bind_addr, pool, JwtTokenCodec::new(secret.as_bytes()))
        .with_token_policy(TokenPolicy::from_hours(settings.jwt_expiry_hours));
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let accounts = build_account_service(&config);
    if let Some(seed) = settings.admin_seed() {
        seed_admin(&accounts, seed).await?;
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, accounts, config)?;
    server.await
}
