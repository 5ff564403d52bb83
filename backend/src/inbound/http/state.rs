//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, PredictionCommand, RegistrationService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub predictions: Arc<dyn PredictionCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub predictions: Arc<dyn PredictionCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use heart_predictor::domain::{AccountService, PredictionService};
    /// use heart_predictor::inbound::http::state::{HttpState, HttpStatePorts};
    /// use heart_predictor::outbound::hashing::Argon2PasswordHasher;
    /// use heart_predictor::outbound::memory::{
    ///     InMemoryPredictionRepository, InMemoryUserRepository,
    /// };
    /// use heart_predictor::outbound::model::LinearModel;
    ///
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let accounts = Arc::new(AccountService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2PasswordHasher::default()),
    /// ));
    /// let records = Arc::new(InMemoryPredictionRepository::new(users.clone()));
    /// let classifier = Arc::new(LinearModel::constant(0));
    /// let predictions = Arc::new(PredictionService::new(users, classifier, records));
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     registration: accounts.clone(),
    ///     login: accounts,
    ///     predictions,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            registration,
            login,
            predictions,
        } = ports;
        Self {
            registration,
            login,
            predictions,
        }
    }
}
