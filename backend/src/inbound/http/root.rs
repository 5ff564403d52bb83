//! Service banner at `/`.

use actix_web::{get, web};

use crate::inbound::http::users::MessageResponse;

/// Banner text confirming the API is up.
pub const BANNER: &str = "Heart Disease Predictor API is Running.";

/// Report that the API is running.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "API banner", body = MessageResponse)),
    tags = ["health"],
    operation_id = "root"
)]
#[get("/")]
pub async fn root() -> web::Json<MessageResponse> {
    web::Json(MessageResponse {
        message: BANNER.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn root_reports_banner() {
        let app = test::init_service(App::new().service(root)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body: MessageResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, BANNER);
    }
}
