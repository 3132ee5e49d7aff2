// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{common::error::AppError, config::AppState, models::auth::User};

// Extrator para obter o usuário autenticado diretamente nos handlers.
// Lê o header Authorization, valida o token e carrega o usuário.
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or(AppError::InvalidToken)?;

        let user = app_state.auth_service.validate_token(token).await?;
        Ok(AuthenticatedUser(user))
    }
}

// O Guardião das rotas de administração: autenticado E com is_admin.
// A autorização acontece aqui, antes dos services serem chamados; o
// núcleo do catálogo nunca enxerga credenciais.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AppError::AdminRequired);
        }

        Ok(AdminUser(user))
    }
}
