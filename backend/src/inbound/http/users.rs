//! Account API handlers.
//!
//! ```text
//! POST /register {"username":"alice","email":"a@x.com","password":"pw1"}
//! POST /login {"username":"alice","password":"pw1"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    ApiResult, Error, LoginCredentials, LoginValidationError, Registration,
    RegistrationValidationError, UserValidationError,
};
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "pw1")]
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Login request body for `POST /login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "pw1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User registered successfully")]
    pub message: String,
}

/// Successful login body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    #[schema(example = "alice")]
    pub username: String,
}

fn invalid_field(message: String, field: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    let message = err.to_string();
    match err {
        RegistrationValidationError::User(UserValidationError::EmptyUsername) => {
            invalid_field(message, "username", "empty_username")
        }
        RegistrationValidationError::User(UserValidationError::UsernameTooLong { .. }) => {
            invalid_field(message, "username", "username_too_long")
        }
        RegistrationValidationError::User(UserValidationError::EmptyEmail) => {
            invalid_field(message, "email", "empty_email")
        }
        RegistrationValidationError::User(UserValidationError::EmailTooLong { .. }) => {
            invalid_field(message, "email", "email_too_long")
        }
        RegistrationValidationError::User(UserValidationError::InvalidEmail) => {
            invalid_field(message, "email", "invalid_email")
        }
        RegistrationValidationError::User(
            UserValidationError::EmptyId | UserValidationError::InvalidId,
        ) => Error::internal(message),
        RegistrationValidationError::EmptyPassword => {
            invalid_field(message, "password", "empty_password")
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => invalid_field(
            "username must not be empty".to_owned(),
            "username",
            "empty_username",
        ),
        LoginValidationError::EmptyPassword => invalid_field(
            "password must not be empty".to_owned(),
            "password",
            "empty_password",
        ),
    }
}

/// Create an account.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid request, or username/email already taken", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_registration_validation_error)?;
    state.registration.register(&registration).await?;
    Ok(web::Json(MessageResponse {
        message: "User registered successfully".to_owned(),
    }))
}

/// Verify credentials.
///
/// No session or token is issued; success only confirms the password.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let username = state.login.authenticate(&credentials).await?;
    Ok(web::Json(LoginResponse {
        message: "Login successful".to_owned(),
        username: username.into(),
    }))
}

#[cfg(test)]
mod tests;
