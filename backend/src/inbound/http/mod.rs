//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod predictions;
pub mod root;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use crate::domain::ApiResult;

/// Register the API handlers and the JSON extractor configuration.
///
/// Health probes are registered separately because they read
/// [`health::HealthState`] rather than [`state::HttpState`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use heart_predictor::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .service(root::root)
        .service(users::register)
        .service(users::login)
        .service(predictions::predict);
}
