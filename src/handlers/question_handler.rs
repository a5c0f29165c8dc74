use actix_web::{get, post, put, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    handlers::{ajax_required, is_ajax},
    models::dto::{
        request::{QuestionDraft, UpdateQuestionRequest},
        response::QuestionDto,
    },
    services::BatchOutcome,
};

/// Editor read-back. An empty test is seeded with one placeholder question,
/// so the author always has something to edit.
#[get("/{test_id}/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state
        .test_service
        .get_owned_test(&test_id, &auth.0.sub)
        .await?;

    let questions = state.question_service.list_for_editor(&test.id).await?;
    let questions: Vec<QuestionDto> = questions.into_iter().map(QuestionDto::from).collect();
    Ok(HttpResponse::Ok().json(questions))
}

/// Bulk creation from the authoring frontend: the body is the whole ordered
/// batch, accepted or rejected as one.
#[post("/{test_id}/questions")]
pub async fn create_questions(
    state: web::Data<AppState>,
    test_id: web::Path<String>,
    drafts: web::Json<Vec<QuestionDraft>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state
        .test_service
        .get_owned_test(&test_id, &auth.0.sub)
        .await?;

    match state
        .question_service
        .create_batch(&test.id, drafts.into_inner())
        .await?
    {
        BatchOutcome::Created(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "response": "Questions were successfully created"
        }))),
        BatchOutcome::Rejected(errors) => Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "response": errors
        }))),
    }
}

#[post("/{test_id}/questions/default")]
pub async fn add_question(
    state: web::Data<AppState>,
    req: HttpRequest,
    test_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if !is_ajax(&req) {
        return Ok(ajax_required());
    }

    let test = state
        .test_service
        .get_owned_test(&test_id, &auth.0.sub)
        .await?;

    let question = state.question_service.add_default_question(&test.id).await?;
    Ok(HttpResponse::Ok().json(QuestionDto::from(question)))
}

#[post("/{test_id}/questions/{question_id}/options")]
pub async fn add_option(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if !is_ajax(&req) {
        return Ok(ajax_required());
    }

    let (test_id, question_id) = path.into_inner();
    let test = state
        .test_service
        .get_owned_test(&test_id, &auth.0.sub)
        .await?;

    let (question, option) = state
        .question_service
        .add_default_option(&test.id, &question_id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": option.id,
        "question_id": question.id,
        "option": option.text,
        "is_correct": option.is_correct,
    })))
}

#[put("/{test_id}/questions/{question_id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
    request: web::Json<UpdateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if !is_ajax(&req) {
        return Ok(ajax_required());
    }

    let (test_id, question_id) = path.into_inner();
    let test = state
        .test_service
        .get_owned_test(&test_id, &auth.0.sub)
        .await?;

    state
        .question_service
        .update_question(&test.id, &question_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "response": "Question was successfully saved"
    })))
}
