//! Linear (logistic-regression style) classifier.

use crate::domain::ports::{Classifier, ClassifierError};
use crate::domain::{FEATURE_COUNT, FeatureVector, PredictionLabel};

use super::{ModelLoadError, argmax};

/// Weighted sum per class plus intercept.
///
/// With two classes and a single coefficient row the model is binary:
/// a score of zero or more selects `classes[1]`. Otherwise there is one row
/// per class and the highest score wins, ties going to the earlier class.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    classes: Vec<i32>,
    coefficients: Vec<[f64; FEATURE_COUNT]>,
    intercepts: Vec<f64>,
}

impl LinearModel {
    /// Validate raw parameters.
    pub fn try_new(
        classes: Vec<i32>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Result<Self, ModelLoadError> {
        if classes.is_empty() {
            return Err(ModelLoadError::invalid("classes must not be empty"));
        }
        if coefficients.is_empty() {
            return Err(ModelLoadError::invalid("coefficients must not be empty"));
        }
        let binary = classes.len() == 2 && coefficients.len() == 1;
        if !binary && coefficients.len() != classes.len() {
            return Err(ModelLoadError::invalid(format!(
                "expected {} coefficient rows for {} classes, found {}",
                classes.len(),
                classes.len(),
                coefficients.len()
            )));
        }
        if intercepts.len() != coefficients.len() {
            return Err(ModelLoadError::invalid(format!(
                "expected {} intercepts, found {}",
                coefficients.len(),
                intercepts.len()
            )));
        }

        let mut rows = Vec::with_capacity(coefficients.len());
        for (index, row) in coefficients.into_iter().enumerate() {
            let row: [f64; FEATURE_COUNT] = row.try_into().map_err(|row: Vec<f64>| {
                ModelLoadError::invalid(format!(
                    "coefficient row {index} has {} weights, expected {FEATURE_COUNT}",
                    row.len()
                ))
            })?;
            if row.iter().any(|weight| !weight.is_finite()) {
                return Err(ModelLoadError::invalid(format!(
                    "coefficient row {index} contains a non-finite weight"
                )));
            }
            rows.push(row);
        }
        if intercepts.iter().any(|value| !value.is_finite()) {
            return Err(ModelLoadError::invalid("intercepts must be finite"));
        }

        Ok(Self {
            classes,
            coefficients: rows,
            intercepts,
        })
    }

    /// A model that always answers `label`. Useful for wiring tests.
    pub fn constant(label: i32) -> Self {
        Self {
            classes: vec![label],
            coefficients: vec![[0.0; FEATURE_COUNT]],
            intercepts: vec![0.0],
        }
    }

    fn scores(&self, features: &FeatureVector) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                row.iter()
                    .zip(features.values())
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>()
                    + intercept
            })
            .collect()
    }
}

impl Classifier for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionLabel, ClassifierError> {
        let scores = self.scores(features);
        let index = if self.classes.len() == 2 && scores.len() == 1 {
            let score = scores[0];
            if !score.is_finite() {
                return Err(ClassifierError::evaluation("linear score is not finite"));
            }
            usize::from(score >= 0.0)
        } else {
            argmax(&scores)
                .ok_or_else(|| ClassifierError::evaluation("linear scores are not finite"))?
        };
        Ok(PredictionLabel::new(self.classes[index]))
    }
}
