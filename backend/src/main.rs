//! Backend entry-point: loads settings and the classifier, prepares
//! persistence, then serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use heart_predictor::inbound::http::health::HealthState;
use heart_predictor::outbound::model::ClassifierModel;
use heart_predictor::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{AppSettings, ServerConfig, create_server, drain_on_shutdown};

/// Log a startup failure and convert it for `main`'s return type.
fn startup_failure(stage: &'static str, err: impl std::fmt::Display) -> std::io::Error {
    error!(stage, error = %err, "startup failed");
    std::io::Error::other(format!("{stage}: {err}"))
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

    let settings = AppSettings::load().map_err(|e| startup_failure("settings", e))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_failure("settings", e))?;

    let model_path = settings.model_path();
    let model = ClassifierModel::load(&model_path).map_err(|e| startup_failure("model", e))?;
    info!(path = %model_path.display(), kind = model.kind(), "classifier loaded");

    let config = ServerConfig::new(bind_addr, Arc::new(model))
        .with_allowed_origins(settings.allowed_origins());
    let config = match settings.database_url() {
        Some(url) => {
            let applied = run_migrations(&url)
                .await
                .map_err(|e| startup_failure("migrations", e))?;
            info!(applied, "database migrations applied");
            let pool = DbPool::new(
                PoolConfig::new(url)
                    .with_max_size(settings.pool_max_size())
                    .with_connection_timeout(settings.pool_timeout()),
            )
            .await
            .map_err(|e| startup_failure("database pool", e))?;
            config.with_db_pool(pool)
        }
        None => {
            warn!("no database URL configured; accounts and predictions are kept in memory");
            config
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    drain_on_shutdown(health_state, server.handle());
    server.await
}
