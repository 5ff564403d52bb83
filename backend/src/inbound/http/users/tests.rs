//! Tests for account API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockLoginService, MockPredictionCommand, MockRegistrationService};
use crate::domain::{ErrorCode, UserId, Username};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::test_app;
use crate::outbound::model::LinearModel;
use crate::test_support::in_memory_backend;

fn mocked_state(
    registration: MockRegistrationService,
    login_service: MockLoginService,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        registration: Arc::new(registration),
        login: Arc::new(login_service),
        predictions: Arc::new(MockPredictionCommand::new()),
    })
}

async fn post(state: HttpState, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(state)).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(&body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&bytes).expect("JSON body");
    (status, value)
}

#[actix_web::test]
async fn register_then_login_round_trip() {
    let backend = in_memory_backend(Arc::new(LinearModel::constant(0)));
    let app = actix_test::init_service(test_app(backend.state.clone())).await;

    let register_request = actix_test::TestRequest::post()
        .uri("/register")
        .set_json(json!({"username": "alice", "email": "a@x.com", "password": "pw1"}))
        .to_request();
    let body: MessageResponse = actix_test::call_and_read_body_json(&app, register_request).await;
    assert_eq!(body.message, "User registered successfully");
    assert_eq!(backend.users.len().expect("count users"), 1);

    let login_request = actix_test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"username": "alice", "password": "pw1"}))
        .to_request();
    let body: LoginResponse = actix_test::call_and_read_body_json(&app, login_request).await;
    assert_eq!(body.message, "Login successful");
    assert_eq!(body.username, "alice");
}

#[actix_web::test]
async fn duplicate_username_is_a_bad_request() {
    let backend = in_memory_backend(Arc::new(LinearModel::constant(0)));
    let app = actix_test::init_service(test_app(backend.state.clone())).await;

    for (email, expected) in [
        ("a@x.com", StatusCode::OK),
        ("other@x.com", StatusCode::BAD_REQUEST),
    ] {
        let request = actix_test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": "alice", "email": email, "password": "pw1"}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), expected);
        if expected == StatusCode::BAD_REQUEST {
            let value: Value = actix_test::read_body_json(response).await;
            assert_eq!(value["code"], "conflict");
            assert_eq!(value["message"], "Username already taken");
        }
    }
    assert_eq!(backend.users.len().expect("count users"), 1);
}

#[rstest]
#[case(json!({"username": "", "email": "a@x.com", "password": "pw"}), "username", "empty_username")]
#[case(json!({"username": "alice", "email": "nope", "password": "pw"}), "email", "invalid_email")]
#[case(json!({"username": "alice", "email": "", "password": "pw"}), "email", "empty_email")]
#[case(json!({"username": "alice", "email": "a@x.com", "password": ""}), "password", "empty_password")]
#[case(
    json!({"username": "a".repeat(51), "email": "a@x.com", "password": "pw"}),
    "username",
    "username_too_long"
)]
#[actix_web::test]
async fn register_rejects_invalid_fields(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let state = mocked_state(MockRegistrationService::new(), MockLoginService::new());
    let (status, value) = post(state, "/register", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[rstest]
#[case(json!({"username": "alice"}))]
#[case(json!({"username": "alice", "email": 7, "password": "pw"}))]
#[actix_web::test]
async fn malformed_register_body_is_invalid_request(#[case] body: Value) {
    let state = mocked_state(MockRegistrationService::new(), MockLoginService::new());
    let (status, value) = post(state, "/register", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "invalid_request");
}

#[actix_web::test]
async fn register_passes_normalised_registration_to_service() {
    let mut registration = MockRegistrationService::new();
    registration
        .expect_register()
        .withf(|reg| reg.username().as_ref() == "alice" && reg.email().as_ref() == "a@x.com")
        .times(1)
        .returning(|_| Ok(UserId::random()));
    let state = mocked_state(registration, MockLoginService::new());
    let (status, value) = post(
        state,
        "/register",
        json!({"username": " alice ", "email": " a@x.com ", "password": "pw1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"message": "User registered successfully"}));
}

#[actix_web::test]
async fn store_outage_during_register_is_unavailable() {
    let mut registration = MockRegistrationService::new();
    registration
        .expect_register()
        .returning(|_| Err(Error::service_unavailable("user repository unavailable")));
    let state = mocked_state(registration, MockLoginService::new());
    let (status, value) = post(
        state,
        "/register",
        json!({"username": "alice", "email": "a@x.com", "password": "pw1"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(value["code"], "service_unavailable");
}

#[rstest]
#[case("alice", "wrong")]
#[case("nobody", "pw1")]
#[actix_web::test]
async fn login_failures_are_unauthorised_and_indistinguishable(
    #[case] username: &str,
    #[case] password: &str,
) {
    let backend = in_memory_backend(Arc::new(LinearModel::constant(0)));
    let app = actix_test::init_service(test_app(backend.state.clone())).await;
    let register_request = actix_test::TestRequest::post()
        .uri("/register")
        .set_json(json!({"username": "alice", "email": "a@x.com", "password": "pw1"}))
        .to_request();
    assert!(actix_test::call_service(&app, register_request).await.status().is_success());

    let request = actix_test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"username": username, "password": password}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "unauthorized");
    assert_eq!(value["message"], "Invalid username or password");
}

#[rstest]
#[case(json!({"username": "  ", "password": "pw"}), "username", "empty_username")]
#[case(json!({"username": "alice", "password": ""}), "password", "empty_password")]
#[actix_web::test]
async fn login_rejects_blank_fields(#[case] body: Value, #[case] field: &str, #[case] code: &str) {
    let state = mocked_state(MockRegistrationService::new(), MockLoginService::new());
    let (status, value) = post(state, "/login", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[actix_web::test]
async fn login_echoes_the_canonical_username() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_authenticate()
        .withf(|creds| creds.username() == "alice" && creds.password() == "pw1")
        .returning(|_| Username::new("alice").map_err(|err| Error::internal(err.to_string())));
    let state = mocked_state(MockRegistrationService::new(), login_service);
    let (status, value) = post(
        state,
        "/login",
        json!({"username": "  alice", "password": "pw1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"message": "Login successful", "username": "alice"}));
}

#[actix_web::test]
async fn internal_login_failure_is_redacted() {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_authenticate()
        .returning(|_| Err(Error::internal("digest column corrupt")));
    let state = mocked_state(MockRegistrationService::new(), login_service);
    let (status, value) = post(
        state,
        "/login",
        json!({"username": "alice", "password": "pw1"}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(value["code"], serde_json::to_value(ErrorCode::InternalError).expect("code"));
    assert_eq!(value["message"], "Internal server error");
}
