// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário no banco de dados,
    // com tratamento de erro específico para e-mail/usuário duplicados.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        username: &str,
        full_name: &str,
        phone: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, full_name, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(username)
        .bind(full_name)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    if let Some(constraint) = db_err.constraint() {
                        return match constraint {
                            // Nomes padrão que o Postgres cria para os UNIQUE
                            "users_email_key" => AppError::EmailAlreadyExists,
                            "users_username_key" => AppError::UsernameAlreadyExists,

                            // Fallback (caso adicione outras chaves únicas no futuro)
                            _ => AppError::UniqueConstraintViolation(constraint.to_string()),
                        };
                    }
                }
            }
            e.into()
        })
    }
}
