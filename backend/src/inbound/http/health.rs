//! Liveness endpoint.

use actix_web::{HttpResponse, get};
use serde_json::json;

/// Report process liveness. Carries no dependency checks; a healthy
/// response only means the HTTP layer is serving.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};

    #[actix_web::test]
    async fn health_answers_ok() {
        let app = test::init_service(App::new().service(super::health)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());
    }
}
