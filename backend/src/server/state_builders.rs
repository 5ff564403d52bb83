//! Builders for HTTP state ports over the configured persistence backend.

use std::sync::Arc;

use heart_predictor::domain::ports::{Classifier, PredictionRepository, UserRepository};
use heart_predictor::domain::{AccountService, PredictionService};
use heart_predictor::inbound::http::state::{HttpState, HttpStatePorts};
use heart_predictor::outbound::hashing::Argon2PasswordHasher;
use heart_predictor::outbound::memory::{InMemoryPredictionRepository, InMemoryUserRepository};
use heart_predictor::outbound::persistence::{
    DbPool, DieselPredictionRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Wire the account and prediction services over one pair of repositories.
fn assemble<U, P>(users: Arc<U>, predictions: Arc<P>, classifier: Arc<dyn Classifier>) -> HttpState
where
    U: UserRepository + 'static,
    P: PredictionRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::default()),
    ));
    let prediction_service = Arc::new(PredictionService::new(users, classifier, predictions));
    HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts,
        predictions: prediction_service,
    })
}

fn diesel_state(pool: &DbPool, classifier: Arc<dyn Classifier>) -> HttpState {
    assemble(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselPredictionRepository::new(pool.clone())),
        classifier,
    )
}

fn in_memory_state(classifier: Arc<dyn Classifier>) -> HttpState {
    let users = Arc::new(InMemoryUserRepository::default());
    let predictions = Arc::new(InMemoryPredictionRepository::new(users.clone()));
    assemble(users, predictions, classifier)
}

/// Build HTTP state from configuration.
///
/// Uses the Diesel repositories when a pool is configured, otherwise the
/// in-memory stores.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let classifier = config.classifier.clone();
    match &config.db_pool {
        Some(pool) => diesel_state(pool, classifier),
        None => in_memory_state(classifier),
    }
}
