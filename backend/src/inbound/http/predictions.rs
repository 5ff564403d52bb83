//! Prediction API handler.
//!
//! ```text
//! POST /predict {"username":"alice","age":63,"sex":1,...,"slope_of_st_segment":0}
//! ```
//!
//! Feature fields accept both the snake_case names and the legacy
//! capitalised names (`Chest_Pain`, `ST_depression_level`, ...).

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, ClinicalFeatures, Error, PredictionLabel, PredictionRequest, UserValidationError,
    Username,
};
use crate::domain::prediction_service::USER_NOT_FOUND_MESSAGE;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /predict`.
///
/// Values are type-checked by the JSON extractor but not range-checked.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PredictRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = 63)]
    pub age: i32,
    #[schema(example = 1)]
    pub sex: i32,
    #[serde(alias = "Chest_Pain")]
    #[schema(example = 3)]
    pub chest_pain: i32,
    #[serde(alias = "Resting_Blood_Pressure")]
    #[schema(example = 145)]
    pub resting_blood_pressure: i32,
    #[serde(alias = "Cholesterol")]
    #[schema(example = 233)]
    pub cholesterol: i32,
    #[serde(alias = "Fasting_Blood_Sugar")]
    #[schema(example = 1)]
    pub fasting_blood_sugar: i32,
    #[serde(alias = "Resting_ECG_Results")]
    #[schema(example = 0)]
    pub resting_ecg_results: i32,
    #[serde(alias = "Maximum_Heart_Rate_Achieved")]
    #[schema(example = 150)]
    pub maximum_heart_rate_achieved: i32,
    #[serde(alias = "Chest_Pain_During_Exercise")]
    #[schema(example = 0)]
    pub chest_pain_during_exercise: i32,
    #[serde(alias = "ST_depression_level")]
    #[schema(example = 2.3)]
    pub st_depression_level: f64,
    #[serde(alias = "Slope_of_ST_segment")]
    #[schema(example = 0)]
    pub slope_of_st_segment: i32,
}

impl PredictRequest {
    fn features(&self) -> ClinicalFeatures {
        ClinicalFeatures {
            age: self.age,
            sex: self.sex,
            chest_pain: self.chest_pain,
            resting_blood_pressure: self.resting_blood_pressure,
            cholesterol: self.cholesterol,
            fasting_blood_sugar: self.fasting_blood_sugar,
            resting_ecg_results: self.resting_ecg_results,
            maximum_heart_rate_achieved: self.maximum_heart_rate_achieved,
            chest_pain_during_exercise: self.chest_pain_during_exercise,
            st_depression_level: self.st_depression_level,
            slope_of_st_segment: self.slope_of_st_segment,
        }
    }
}

impl TryFrom<PredictRequest> for PredictionRequest {
    type Error = UserValidationError;

    fn try_from(value: PredictRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: Username::new(&value.username)?,
            features: value.features(),
        })
    }
}

/// Body returned by `POST /predict`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PredictResponse {
    #[schema(value_type = i32, example = 1)]
    pub prediction: PredictionLabel,
}

/// A name longer than any stored username cannot belong to a user.
fn map_username_error(err: UserValidationError) -> Error {
    match err {
        UserValidationError::UsernameTooLong { .. } => Error::not_found(USER_NOT_FOUND_MESSAGE),
        other => Error::invalid_request(other.to_string())
            .with_details(json!({ "field": "username", "code": "empty_username" })),
    }
}

/// Score an observation and record it against the user.
#[utoipa::path(
    post,
    path = "/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Predicted class label", body = PredictResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "User not found", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Model or database failure", body = Error)
    ),
    tags = ["predictions"],
    operation_id = "predict"
)]
#[post("/predict")]
pub async fn predict(
    state: web::Data<HttpState>,
    payload: web::Json<PredictRequest>,
) -> ApiResult<web::Json<PredictResponse>> {
    let request = PredictionRequest::try_from(payload.into_inner()).map_err(map_username_error)?;
    let prediction = state.predictions.predict(&request).await?;
    Ok(web::Json(PredictResponse { prediction }))
}
