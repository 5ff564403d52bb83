//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, classifier) expose typed errors so
//! adapters map their failures into predictable variants. Driving ports
//! return the API-facing [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod classifier;
mod login_service;
mod password_hasher;
mod prediction_command;
mod prediction_repository;
mod registration_service;
mod user_repository;

#[cfg(test)]
pub use classifier::MockClassifier;
pub use classifier::{Classifier, ClassifierError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use prediction_command::MockPredictionCommand;
pub use prediction_command::PredictionCommand;
#[cfg(test)]
pub use prediction_repository::MockPredictionRepository;
pub use prediction_repository::{PredictionPersistenceError, PredictionRepository};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
