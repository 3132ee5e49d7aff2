// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, User},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário registrado", body = User),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail ou nome de usuário já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state.auth_service.register_user(&payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let auth = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(auth)))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    Ok((StatusCode::OK, Json(user)))
}
