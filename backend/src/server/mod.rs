//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{AppSettings, SettingsError};

use state_builders::build_http_state;

use actix_cors::Cors;
use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use heart_predictor::Trace;
#[cfg(debug_assertions)]
use heart_predictor::doc::ApiDoc;
use heart_predictor::inbound::http::configure;
use heart_predictor::inbound::http::health::{HealthState, live, ready};
use heart_predictor::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    allowed_origins: Vec<String>,
}

/// Browser clients may call from any origin unless origins are configured.
fn build_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();
    }
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        allowed_origins,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(build_cors(&allowed_origins))
        .wrap(Trace)
        .configure(configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let persistence = if config.db_pool.is_some() {
        "postgres"
    } else {
        "memory"
    };
    let ServerConfig {
        bind_addr,
        allowed_origins,
        classifier: _,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            allowed_origins: allowed_origins.clone(),
        })
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, persistence, "server listening");
    health_state.mark_ready();
    Ok(server)
}

/// Fail liveness probes, then stop accepting connections and let in-flight
/// requests finish.
async fn drain(health_state: web::Data<HealthState>, handle: ServerHandle) {
    health_state.mark_unhealthy();
    info!("draining connections");
    handle.stop(true).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal");
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Drain the server when the process receives Ctrl+C or SIGTERM.
///
/// Actix's own signal handling is disabled in [`create_server`] so liveness
/// turns unhealthy before the listener closes.
pub fn drain_on_shutdown(health_state: web::Data<HealthState>, handle: ServerHandle) {
    actix_web::rt::spawn(async move {
        shutdown_signal().await;
        drain(health_state, handle).await;
    });
}

#[cfg(test)]
mod tests {
    //! Full application wiring: middleware, routes and CORS.

    use std::sync::Arc;

    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use heart_predictor::domain::TRACE_ID_HEADER;
    use heart_predictor::outbound::model::LinearModel;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;

    fn deps(origins: Vec<String>) -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket address"),
            Arc::new(LinearModel::constant(0)),
        );
        AppDependencies {
            health_state,
            http_state: web::Data::new(build_http_state(&config)),
            allowed_origins: origins,
        }
    }

    #[actix_web::test]
    async fn banner_carries_trace_header() {
        let app = actix_test::init_service(build_app(deps(Vec::new()))).await;
        let request = actix_test::TestRequest::get().uri("/").to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body, json!({"message": "Heart Disease Predictor API is Running."}));
    }

    #[rstest]
    #[case("/health/ready")]
    #[case("/health/live")]
    #[actix_web::test]
    async fn probes_are_mounted(#[case] uri: &str) {
        let app = actix_test::init_service(build_app(deps(Vec::new()))).await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn any_origin_is_allowed_by_default() {
        let app = actix_test::init_service(build_app(deps(Vec::new()))).await;
        let request = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://somewhere.example"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[actix_web::test]
    async fn configured_origins_are_echoed() {
        let origin = "https://app.example";
        let app =
            actix_test::init_service(build_app(deps(vec![origin.to_owned()]))).await;
        let request = actix_test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some(origin)
        );
    }

    #[actix_web::test]
    async fn draining_fails_liveness_and_stops_the_server() {
        let health_state = web::Data::new(HealthState::new());
        let config = ServerConfig::new(
            "127.0.0.1:0".parse().expect("socket address"),
            Arc::new(LinearModel::constant(0)),
        );
        let server = create_server(health_state.clone(), config).expect("bind ephemeral port");
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);
        assert!(health_state.is_ready());
        assert!(health_state.is_alive());

        drain(health_state.clone(), handle).await;

        assert!(!health_state.is_alive());
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }
}
