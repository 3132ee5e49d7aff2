// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante mapeia para um status HTTP no `IntoResponse` abaixo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Requer permissão de administrador")]
    AdminRequired,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    // Categoria com produtos vinculados não pode ser removida.
    #[error("Categoria possui produtos vinculados")]
    CategoryInUse,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Imagem não encontrada")]
    ImageNotFound,

    #[error("Variante não encontrada")]
    VariantNotFound,

    #[error("Tabela de quilates: entrada não encontrada")]
    CaratPricingNotFound,

    // A oferta do produto não tem linha para o peso pedido.
    // Diferente de UnavailableCarat: aqui a linha nem existe.
    #[error("Peso de quilate não cadastrado para o produto")]
    CaratRowNotFound,

    // Peso duplicado entre entradas ativas da tabela global.
    #[error("Peso de quilate já cadastrado: {0}")]
    CaratWeightAlreadyExists(String),

    // Lote de oferta estruturalmente inválido (ex.: dois padrões).
    // Rejeitado por inteiro, nada é aplicado.
    #[error("Oferta de quilates inválida: {0}")]
    InvalidOffering(String),

    // O peso existe (talvez até na tabela global), mas não está
    // disponível para venda neste produto.
    #[error("Peso de quilate indisponível para este produto")]
    UnavailableCarat,

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            AppError::UsernameAlreadyExists => {
                (StatusCode::CONFLICT, "Este nome de usuário já está em uso.".to_string())
            }
            AppError::CaratWeightAlreadyExists(weight) => (
                StatusCode::CONFLICT,
                format!("Já existe uma entrada ativa para o peso {}.", weight),
            ),
            AppError::UniqueConstraintViolation(constraint) => (
                StatusCode::CONFLICT,
                format!("Registro duplicado ({}).", constraint),
            ),

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::AdminRequired => (
                StatusCode::FORBIDDEN,
                "Esta operação requer permissão de administrador.".to_string(),
            ),

            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::CategoryNotFound => {
                (StatusCode::NOT_FOUND, "Categoria não encontrada.".to_string())
            }
            AppError::CategoryInUse => (
                StatusCode::CONFLICT,
                "A categoria ainda possui produtos vinculados.".to_string(),
            ),
            AppError::ProductNotFound => {
                (StatusCode::NOT_FOUND, "Produto não encontrado.".to_string())
            }
            AppError::ImageNotFound => {
                (StatusCode::NOT_FOUND, "Imagem não encontrada.".to_string())
            }
            AppError::VariantNotFound => {
                (StatusCode::NOT_FOUND, "Variante do produto não encontrada.".to_string())
            }
            AppError::CaratPricingNotFound => {
                (StatusCode::NOT_FOUND, "Tamanho de quilate não encontrado na tabela de preços.".to_string())
            }
            AppError::CaratRowNotFound => (
                StatusCode::NOT_FOUND,
                "Este peso de quilate não está cadastrado para o produto.".to_string(),
            ),

            AppError::InvalidOffering(reason) => (
                StatusCode::BAD_REQUEST,
                format!("Oferta de quilates inválida: {}.", reason),
            ),
            AppError::UnavailableCarat => (
                StatusCode::BAD_REQUEST,
                "Este peso de quilate não está disponível para o produto.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
