//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` and `email` each carry a unique constraint
    /// (`users_username_key`, `users_email_key`).
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login handle (max 50 characters).
        username -> Varchar,
        /// Contact address (max 100 characters).
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per prediction request, never updated.
    prediction_records (id) {
        id -> Uuid,
        /// Owning user; foreign key to `users.id`.
        user_id -> Uuid,
        age -> Int4,
        sex -> Int4,
        chest_pain -> Int4,
        resting_blood_pressure -> Int4,
        cholesterol -> Int4,
        fasting_blood_sugar -> Int4,
        resting_ecg_results -> Int4,
        maximum_heart_rate_achieved -> Int4,
        chest_pain_during_exercise -> Int4,
        st_depression_level -> Float8,
        slope_of_st_segment -> Int4,
        /// Classifier output label.
        prediction -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(prediction_records -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(prediction_records, users);
