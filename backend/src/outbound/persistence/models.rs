//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    ClinicalFeatures, EmailAddress, PasswordDigest, PredictionLabel, PredictionRecord, User,
    UserAccount, UserId, UserValidationError, Username,
};

use super::schema::{prediction_records, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl TryFrom<UserRow> for UserAccount {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user = User::new(
            UserId::from_uuid(row.id),
            Username::new(row.username)?,
            EmailAddress::new(row.email)?,
        );
        Ok(Self {
            user,
            password_digest: PasswordDigest::new(row.password_hash),
        })
    }
}

/// Insertable struct for creating new user records.
///
/// `created_at` is left to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl<'a> From<&'a UserAccount> for NewUserRow<'a> {
    fn from(account: &'a UserAccount) -> Self {
        Self {
            id: *account.user.id().as_uuid(),
            username: account.user.username().as_ref(),
            email: account.user.email().as_ref(),
            password_hash: account.password_digest.as_str(),
        }
    }
}

/// Row struct for prediction history, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = prediction_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PredictionRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
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
    pub prediction: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&PredictionRecord> for PredictionRecordRow {
    fn from(record: &PredictionRecord) -> Self {
        let ClinicalFeatures {
            age,
            sex,
            chest_pain,
            resting_blood_pressure,
            cholesterol,
            fasting_blood_sugar,
            resting_ecg_results,
            maximum_heart_rate_achieved,
            chest_pain_during_exercise,
            st_depression_level,
            slope_of_st_segment,
        } = record.features;
        Self {
            id: record.id,
            user_id: *record.user_id.as_uuid(),
            age,
            sex,
            chest_pain,
            resting_blood_pressure,
            cholesterol,
            fasting_blood_sugar,
            resting_ecg_results,
            maximum_heart_rate_achieved,
            chest_pain_during_exercise,
            st_depression_level,
            slope_of_st_segment,
            prediction: record.prediction.value(),
            created_at: record.created_at,
        }
    }
}

impl From<PredictionRecordRow> for PredictionRecord {
    fn from(row: PredictionRecordRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            features: ClinicalFeatures {
                age: row.age,
                sex: row.sex,
                chest_pain: row.chest_pain,
                resting_blood_pressure: row.resting_blood_pressure,
                cholesterol: row.cholesterol,
                fasting_blood_sugar: row.fasting_blood_sugar,
                resting_ecg_results: row.resting_ecg_results,
                maximum_heart_rate_achieved: row.maximum_heart_rate_achieved,
                chest_pain_during_exercise: row.chest_pain_during_exercise,
                st_depression_level: row.st_depression_level,
                slope_of_st_segment: row.slope_of_st_segment,
            },
            prediction: PredictionLabel::new(row.prediction),
            created_at: row.created_at,
        }
    }
}
