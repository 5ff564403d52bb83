//! Clinical feature inputs and classifier outputs.
//!
//! The classifier was trained on eleven features in a fixed order. Handlers
//! and persistence adapters refer to features by name; only
//! [`ClinicalFeatures::to_vector`] fixes the positional layout.

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 11;

/// Canonical feature names in classifier input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "chest_pain",
    "resting_blood_pressure",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg_results",
    "maximum_heart_rate_achieved",
    "chest_pain_during_exercise",
    "st_depression_level",
    "slope_of_st_segment",
];

/// One patient observation as submitted by a client.
///
/// Categorical fields are integer-coded. Values are not range-checked; the
/// classifier is trusted to cope with whatever the client sends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClinicalFeatures {
    pub age: i32,
    pub sex: i32,
    pub chest_pain: i32,
    pub resting_blood_pressure: i32,
    pub cholesterol: i32,
    pub fasting_blood_sugar: i32,
    pub resting_ecg_results: i32,
    pub maximum_heart_rate_achieved: i32,
    pub chest_pain_during_exercise: i32,
    pub st_depression_level: f64,
    pub slope_of_st_segment: i32,
}

impl ClinicalFeatures {
    /// Assemble the classifier input in training order.
    ///
    /// # Examples
    /// ```
    /// use heart_predictor::domain::ClinicalFeatures;
    ///
    /// let features = ClinicalFeatures {
    ///     age: 63,
    ///     sex: 1,
    ///     chest_pain: 3,
    ///     resting_blood_pressure: 145,
    ///     cholesterol: 233,
    ///     fasting_blood_sugar: 1,
    ///     resting_ecg_results: 0,
    ///     maximum_heart_rate_achieved: 150,
    ///     chest_pain_during_exercise: 0,
    ///     st_depression_level: 2.3,
    ///     slope_of_st_segment: 0,
    /// };
    /// assert_eq!(features.to_vector().values()[0], 63.0);
    /// assert_eq!(features.to_vector().values()[9], 2.3);
    /// ```
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector([
            f64::from(self.age),
            f64::from(self.sex),
            f64::from(self.chest_pain),
            f64::from(self.resting_blood_pressure),
            f64::from(self.cholesterol),
            f64::from(self.fasting_blood_sugar),
            f64::from(self.resting_ecg_results),
            f64::from(self.maximum_heart_rate_achieved),
            f64::from(self.chest_pain_during_exercise),
            self.st_depression_level,
            f64::from(self.slope_of_st_segment),
        ])
    }
}

/// Fixed-width numeric classifier input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Wrap raw values already in training order.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Values in training order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }
}

/// Discrete class label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionLabel(i32);

impl PredictionLabel {
    /// Wrap a raw label.
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw integer label.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn vector_follows_feature_names_order() {
        let features = ClinicalFeatures {
            age: 1,
            sex: 2,
            chest_pain: 3,
            resting_blood_pressure: 4,
            cholesterol: 5,
            fasting_blood_sugar: 6,
            resting_ecg_results: 7,
            maximum_heart_rate_achieved: 8,
            chest_pain_during_exercise: 9,
            st_depression_level: 10.5,
            slope_of_st_segment: 11,
        };
        assert_eq!(
            features.to_vector().values(),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.5, 11.0]
        );
        assert_eq!(FEATURE_NAMES[9], "st_depression_level");
    }

    #[rstest]
    fn label_serialises_as_bare_integer() {
        let value = serde_json::to_value(PredictionLabel::new(1)).expect("serialise label");
        assert_eq!(value, serde_json::json!(1));
    }
}
