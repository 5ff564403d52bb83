//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! each suite pulls in only the helpers it uses.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use heart_predictor::Trace;
use heart_predictor::inbound::http::configure;
use heart_predictor::inbound::http::state::HttpState;

/// App exposing the API over `state`, wrapped in the trace middleware as in
/// production.
#[allow(dead_code)]
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(configure)
}

/// Database URL for suites that need PostgreSQL.
///
/// Returns `None`, after printing a skip marker, when `TEST_DATABASE_URL` is
/// unset so the suite passes on machines without a database.
#[allow(dead_code)]
pub fn test_database_url(suite: &str) -> Option<String> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {suite} needs TEST_DATABASE_URL");
            None
        }
    }
}
