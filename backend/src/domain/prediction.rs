//! Prediction requests and the records persisted for each inference.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::clinical::{ClinicalFeatures, PredictionLabel};
use super::user::{UserId, Username};

/// A client's request to score one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub username: Username,
    pub features: ClinicalFeatures,
}

/// Stored outcome of a single prediction.
///
/// ## Invariants
/// - `user_id` references an existing user (foreign key in storage).
/// - Records are immutable once written.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub features: ClinicalFeatures,
    pub prediction: PredictionLabel,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Build a fresh record for the given user and classifier output.
    pub fn new(user_id: UserId, features: ClinicalFeatures, prediction: PredictionLabel) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            features,
            prediction,
            created_at: Utc::now(),
        }
    }
}
