pub mod auth_handler;
pub mod question_handler;
pub mod student_handler;
pub mod test_handler;

use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::auth::AuthMiddleware;

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/live")]
async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// The incremental editor endpoints only serve the authoring frontend's
/// XMLHttpRequest calls; anything else is turned away before any work.
pub(crate) fn is_ajax(req: &HttpRequest) -> bool {
    req.headers()
        .get("X-Requested-With")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

pub(crate) fn ajax_required() -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": "ajax request is required"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(
            web::scope("/api/auth")
                .service(auth_handler::register)
                .service(auth_handler::login)
                .service(auth_handler::refresh_token),
        )
        .service(
            web::scope("/api/tests")
                .wrap(AuthMiddleware)
                .service(test_handler::create_test)
                .service(test_handler::list_tests)
                .service(test_handler::get_test)
                .service(test_handler::delete_test)
                .service(test_handler::get_result)
                .service(question_handler::list_questions)
                .service(question_handler::create_questions)
                .service(question_handler::add_question)
                .service(question_handler::add_option)
                .service(question_handler::update_question),
        )
        .service(student_handler::register_student)
        .service(student_handler::submit_test);
}
