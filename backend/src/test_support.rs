//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Everything here runs without a database.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::domain::ports::Classifier;
use crate::domain::{AccountService, ClinicalFeatures, PredictionService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::hashing::Argon2PasswordHasher;
use crate::outbound::memory::{InMemoryPredictionRepository, InMemoryUserRepository};
use crate::outbound::model::ClassifierModel;

/// HTTP state wired to in-memory stores, with the stores kept reachable so
/// tests can inspect what was written.
#[derive(Clone)]
pub struct InMemoryBackend {
    pub users: Arc<InMemoryUserRepository>,
    pub predictions: Arc<InMemoryPredictionRepository>,
    pub state: HttpState,
}

/// Argon2 at its cheapest settings so tests stay fast.
///
/// # Panics
/// Panics if argon2 rejects its own minimum parameters.
pub fn fast_hasher() -> Arc<Argon2PasswordHasher> {
    Arc::new(Argon2PasswordHasher::minimal_cost().expect("argon2 minimum parameters are valid"))
}

/// Wire the real services over empty in-memory stores.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use heart_predictor::outbound::model::LinearModel;
/// use heart_predictor::test_support::in_memory_backend;
///
/// let backend = in_memory_backend(Arc::new(LinearModel::constant(1)));
/// assert!(backend.users.is_empty().unwrap());
/// ```
pub fn in_memory_backend(classifier: Arc<dyn Classifier>) -> InMemoryBackend {
    let users = Arc::new(InMemoryUserRepository::default());
    let predictions = Arc::new(InMemoryPredictionRepository::new(users.clone()));
    let accounts = Arc::new(AccountService::new(users.clone(), fast_hasher()));
    let prediction_service = Arc::new(PredictionService::new(
        users.clone(),
        classifier,
        predictions.clone(),
    ));
    let state = HttpState::new(HttpStatePorts {
        registration: accounts.clone(),
        login: accounts,
        predictions: prediction_service,
    });
    InMemoryBackend {
        users,
        predictions,
        state,
    }
}

/// The classifier artifact shipped with the crate.
///
/// # Panics
/// Panics if the artifact is missing or invalid.
pub fn shipped_model() -> Arc<ClassifierModel> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/heart_model.json");
    Arc::new(ClassifierModel::load(path).expect("shipped model artifact loads"))
}

/// A typical patient observation.
pub fn example_features() -> ClinicalFeatures {
    ClinicalFeatures {
        age: 63,
        sex: 1,
        chest_pain: 3,
        resting_blood_pressure: 145,
        cholesterol: 233,
        fasting_blood_sugar: 1,
        resting_ecg_results: 0,
        maximum_heart_rate_achieved: 150,
        chest_pain_during_exercise: 0,
        st_depression_level: 2.3,
        slope_of_st_segment: 0,
    }
}

/// `POST /predict` body for [`example_features`] using snake_case names.
pub fn example_predict_body(username: &str) -> Value {
    let mut body = serde_json::to_value(example_features()).unwrap_or_else(|_| json!({}));
    if let Value::Object(map) = &mut body {
        map.insert("username".to_owned(), Value::from(username));
    }
    body
}

/// `POST /predict` body for [`example_features`] using the capitalised
/// field names older clients send.
pub fn legacy_predict_body(username: &str) -> Value {
    json!({
        "username": username,
        "age": 63,
        "sex": 1,
        "Chest_Pain": 3,
        "Resting_Blood_Pressure": 145,
        "Cholesterol": 233,
        "Fasting_Blood_Sugar": 1,
        "Resting_ECG_Results": 0,
        "Maximum_Heart_Rate_Achieved": 150,
        "Chest_Pain_During_Exercise": 0,
        "ST_depression_level": 2.3,
        "Slope_of_ST_segment": 0,
    })
}
