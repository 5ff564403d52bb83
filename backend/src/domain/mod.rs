//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / UserAccount: registered identity and its stored credential.
//! - ClinicalFeatures / FeatureVector / PredictionLabel: classifier I/O.
//! - AccountService / PredictionService: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod clinical;
pub mod error;
pub mod ports;
pub mod prediction;
pub mod prediction_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordDigest, Registration,
    RegistrationValidationError, UserAccount,
};
pub use self::clinical::{
    ClinicalFeatures, FEATURE_COUNT, FEATURE_NAMES, FeatureVector, PredictionLabel,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::prediction::{PredictionRecord, PredictionRequest};
pub use self::prediction_service::PredictionService;
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use heart_predictor::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
