// src/db/carat_availability_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pricing::{CaratOfferingEntry, ProductCaratAvailability},
};

// Repositório das linhas de oferta (peso de quilate por produto).
// As operações de escrita são pensadas para rodar dentro da transação
// aberta pelo service, com a linha do produto já travada.
#[derive(Clone)]
pub struct CaratAvailabilityRepository {
    pool: PgPool,
}

impl CaratAvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Linhas visíveis ao comprador: só as disponíveis.
    // Empate de sort_order resolve pela ordem de inserção (id sequencial).
    pub async fn list_available<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<ProductCaratAvailability>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ProductCaratAvailability>(
            r#"
            SELECT * FROM product_carat_availability
            WHERE product_id = $1 AND is_available = TRUE
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn list_available_for_products<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
    ) -> Result<Vec<ProductCaratAvailability>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ProductCaratAvailability>(
            r#"
            SELECT * FROM product_carat_availability
            WHERE product_id = ANY($1) AND is_available = TRUE
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn delete_for_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM product_carat_availability WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_entry<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        entry: &CaratOfferingEntry,
    ) -> Result<ProductCaratAvailability, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ProductCaratAvailability>(
            r#"
            INSERT INTO product_carat_availability
                (product_id, carat_weight, is_available, is_default, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(entry.carat_weight)
        .bind(entry.is_available)
        .bind(entry.is_default)
        .bind(entry.sort_order)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    // Passo (a) da troca de padrão: zera o is_default de todas as linhas.
    pub async fn clear_default<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE product_carat_availability SET is_default = FALSE WHERE product_id = $1",
        )
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // Passo (b): marca a linha do peso pedido. Retorna quantas linhas
    // casaram; zero significa que o peso não existe para o produto.
    pub async fn mark_default<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        carat_weight: Decimal,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE product_carat_availability SET is_default = TRUE
            WHERE product_id = $1 AND carat_weight = $2
            "#,
        )
        .bind(product_id)
        .bind(carat_weight)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
