use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{LoginRequest, RefreshTokenRequest, RegisterRequest},
        response::RefreshTokenResponse,
    },
};

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(RefreshTokenResponse {
        token: response.token,
        refresh_token: response.refresh_token,
    }))
}
