// src/db/carat_pricing_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::pricing::{CaratPricing, CreateCaratPricingPayload, UpdateCaratPricingPayload},
};

// Repositório da tabela global peso de quilate -> multiplicador.
// A unicidade do peso entre entradas ativas é garantida pelo índice parcial
// uq_carat_pricing_active_weight; aqui só traduzimos a violação para o
// erro de domínio.
#[derive(Clone)]
pub struct CaratPricingRepository {
    pool: PgPool,
}

impl CaratPricingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all_active<'e, E>(&self, executor: E) -> Result<Vec<CaratPricing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, CaratPricing>(
            "SELECT * FROM carat_pricing WHERE is_active = TRUE ORDER BY carat_weight ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    // Busca por peso exato entre entradas ativas. A comparação é NUMERIC
    // do Postgres: 1.5 e 1.50 são o mesmo valor, sem tolerância de float.
    pub async fn find_by_weight<'e, E>(
        &self,
        executor: E,
        carat_weight: Decimal,
    ) -> Result<Option<CaratPricing>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, CaratPricing>(
            "SELECT * FROM carat_pricing WHERE carat_weight = $1 AND is_active = TRUE",
        )
        .bind(carat_weight)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }

    // Só o multiplicador. None quando não há entrada ativa para o peso;
    // quem decide o fallback é o motor de preços, não o repositório.
    pub async fn lookup_multiplier<'e, E>(
        &self,
        executor: E,
        carat_weight: Decimal,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let multiplier = sqlx::query_scalar::<_, Decimal>(
            "SELECT price_multiplier FROM carat_pricing WHERE carat_weight = $1 AND is_active = TRUE",
        )
        .bind(carat_weight)
        .fetch_optional(executor)
        .await?;
        Ok(multiplier)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        payload: &CreateCaratPricingPayload,
    ) -> Result<CaratPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CaratPricing>(
            r#"
            INSERT INTO carat_pricing (carat_weight, price_multiplier, is_active)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(payload.carat_weight)
        .bind(payload.price_multiplier)
        .bind(payload.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_weight_conflict(e, payload.carat_weight))
    }

    // Atualização parcial. Reativar uma entrada ou trocar o peso pode
    // colidir com outra entrada ativa; o índice parcial barra e nós
    // traduzimos para o erro de conflito.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i64,
        payload: &UpdateCaratPricingPayload,
    ) -> Result<CaratPricing, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, CaratPricing>(
            r#"
            UPDATE carat_pricing SET
                carat_weight = COALESCE($2, carat_weight),
                price_multiplier = COALESCE($3, price_multiplier),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.carat_weight)
        .bind(payload.price_multiplier)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            let weight = payload.carat_weight.unwrap_or_default();
            map_weight_conflict(e, weight)
        })?;

        updated.ok_or(AppError::CaratPricingNotFound)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i64) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM carat_pricing WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::CaratPricingNotFound);
        }
        Ok(())
    }
}

fn map_weight_conflict(e: sqlx::Error, weight: Decimal) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::CaratWeightAlreadyExists(weight.to_string());
        }
    }
    e.into()
}
