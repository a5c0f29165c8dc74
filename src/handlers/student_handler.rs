use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{RegisterStudentRequest, SubmitTestRequest},
        response::ResultDto,
    },
};

/// Public: a student joins a test's roster. No account involved; the
/// registration id is what the student submits with.
#[post("/api/registration/{test_id}")]
pub async fn register_student(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    request: web::Json<RegisterStudentRequest>,
) -> Result<HttpResponse, AppError> {
    let student = state
        .submission_service
        .register_student(&test_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(student))
}

/// Public: hand in answers, get the graded result back.
#[post("/api/submission/{test_id}")]
pub async fn submit_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    request: web::Json<SubmitTestRequest>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .submission_service
        .submit(&test_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ResultDto::from(result)))
}
