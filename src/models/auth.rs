// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "maria@exemplo.com")]
    pub email: String,

    #[schema(example = "maria")]
    pub username: String,

    #[schema(example = "Maria Silva")]
    pub full_name: String,

    pub phone: Option<String>,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub is_active: bool,

    // Compradores se registram com false; a flag é promovida direto no banco.
    pub is_admin: bool,

    pub created_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@exemplo.com")]
    pub email: String,

    #[validate(length(min = 3, message = "O nome de usuário deve ter no mínimo 3 caracteres."))]
    #[schema(example = "maria")]
    pub username: String,

    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    #[schema(example = "Maria Silva")]
    pub full_name: String,

    pub phone: Option<String>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@exemplo.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token e o usuário logado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
