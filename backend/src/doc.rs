//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint from the inbound layer together
//! with the request, response and error schemas they reference. The document
//! backs Swagger UI (debug builds) and is exported via
//! `cargo run --bin openapi-dump` for client generation.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::predictions::{PredictRequest, PredictResponse};
use crate::inbound::http::users::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Heart disease predictor API",
        description = "Account registration, password login and heart-disease risk prediction."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::root::root,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::predictions::predict,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        MessageResponse,
        LoginResponse,
        PredictRequest,
        PredictResponse,
    )),
    tags(
        (name = "users", description = "Account registration and login"),
        (name = "predictions", description = "Heart-disease risk prediction"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/register")]
    #[case("/login")]
    #[case("/predict")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId"])]
    #[case("RegisterRequest", &["username", "email", "password"])]
    #[case("PredictResponse", &["prediction"])]
    #[case("PredictRequest", &["username", "age", "st_depression_level"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }
}
