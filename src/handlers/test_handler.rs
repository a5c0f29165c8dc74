use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{request::CreateTestRequest, response::ResultDto},
};

#[post("")]
pub async fn create_test(
    state: web::Data<AppState>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state
        .test_service
        .create_test(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(test))
}

#[get("")]
pub async fn list_tests(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let tests = state.test_service.list_tests(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(tests))
}

#[get("/{test_id}")]
pub async fn get_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let detail = state
        .test_service
        .get_test_detail(&test_id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[delete("/{test_id}")]
pub async fn delete_test(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.test_service.delete_test(&test_id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "response": "Test was successfully deleted"
    })))
}

#[get("/{test_id}/results/{result_id}")]
pub async fn get_result(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (test_id, result_id) = path.into_inner();
    let result = state
        .test_service
        .get_result(&test_id, &auth.0.sub, &result_id)
        .await?;
    Ok(HttpResponse::Ok().json(ResultDto::from(result)))
}
