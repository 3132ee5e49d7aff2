// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{
        Category, CreateCategoryPayload, CreateProductImagePayload, CreateProductPayload,
        Product, ProductImage, ProductVariant, ProductVariantPayload, UpdateCategoryPayload,
        UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Categorias
    // ---

    pub async fn get_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    pub async fn get_category<'e, E>(
        &self,
        executor: E,
        category_id: Uuid,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1",
        )
        .bind(category_id)
        .fetch_optional(executor)
        .await?;
        Ok(category)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        payload: &CreateCategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, image_url, hero_image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.image_url)
        .bind(&payload.hero_image_url)
        .fetch_one(executor)
        .await?;
        Ok(category)
    }

    // Atualização parcial: campos ausentes mantêm o valor atual.
    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        category_id: Uuid,
        payload: &UpdateCategoryPayload,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                hero_image_url = COALESCE($5, hero_image_url),
                is_active = COALESCE($6, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.image_url)
        .bind(&payload.hero_image_url)
        .bind(payload.is_active)
        .fetch_optional(executor)
        .await?;
        Ok(category)
    }

    // Categoria com produtos não cai em cascata; a FK barra e o erro
    // vira conflito para o chamador decidir o que fazer.
    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        category_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::CategoryInUse;
                    }
                }
                e.into()
            })?;
        Ok(result.rows_affected())
    }

    // ---
    // Produtos
    // ---

    pub async fn get_products<'e, E>(
        &self,
        executor: E,
        category_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE is_available = TRUE
              AND ($1::uuid IS NULL OR category_id = $1)
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(category_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn get_featured_products<'e, E>(
        &self,
        executor: E,
        limit: i64,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE is_available = TRUE AND is_featured = TRUE
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn get_discounted_products<'e, E>(
        &self,
        executor: E,
        limit: i64,
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE is_available = TRUE AND discount_percentage > 0
            ORDER BY discount_percentage DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn get_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // Busca em lote para montar agregados de uma página inteira sem N+1.
    pub async fn get_products_by_ids<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn get_categories_by_ids<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    // Trava a linha do produto para serializar edições concorrentes da
    // oferta (substituição de lote e troca de padrão) no mesmo produto.
    pub async fn get_product_id_for_update<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(id)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                category_id, name, description, base_price, price, image_url,
                carat_weight, color_grade, clarity_grade, cut_grade, shape,
                certificate_number, is_featured, discount_percentage
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(payload.category_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.base_price)
        .bind(payload.price)
        .bind(&payload.image_url)
        .bind(payload.carat_weight)
        .bind(&payload.color_grade)
        .bind(&payload.clarity_grade)
        .bind(&payload.cut_grade)
        .bind(&payload.shape)
        .bind(&payload.certificate_number)
        .bind(payload.is_featured)
        .bind(payload.discount_percentage)
        .fetch_one(executor)
        .await?;
        Ok(product)
    }

    // Atualização parcial; também trava a linha (UPDATE adquire o lock),
    // o que serializa com replace_offering/set_default do mesmo produto.
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                category_id = COALESCE($2, category_id),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                base_price = COALESCE($5, base_price),
                price = COALESCE($6, price),
                image_url = COALESCE($7, image_url),
                carat_weight = COALESCE($8, carat_weight),
                color_grade = COALESCE($9, color_grade),
                clarity_grade = COALESCE($10, clarity_grade),
                cut_grade = COALESCE($11, cut_grade),
                shape = COALESCE($12, shape),
                certificate_number = COALESCE($13, certificate_number),
                is_available = COALESCE($14, is_available),
                is_featured = COALESCE($15, is_featured),
                discount_percentage = COALESCE($16, discount_percentage)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(payload.category_id)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.base_price)
        .bind(payload.price)
        .bind(&payload.image_url)
        .bind(payload.carat_weight)
        .bind(&payload.color_grade)
        .bind(&payload.clarity_grade)
        .bind(&payload.cut_grade)
        .bind(&payload.shape)
        .bind(&payload.certificate_number)
        .bind(payload.is_available)
        .bind(payload.is_featured)
        .bind(payload.discount_percentage)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn toggle_product_featured<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET is_featured = NOT is_featured
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    // As relações (imagens, variantes, oferta) caem junto via ON DELETE CASCADE.
    pub async fn delete_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Imagens do produto
    // ---

    pub async fn get_product_images<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<ProductImage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let images = sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT * FROM product_images
            WHERE product_id = $1
            ORDER BY sort_order ASC, created_at ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(images)
    }

    pub async fn get_images_for_products<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
    ) -> Result<Vec<ProductImage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let images = sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT * FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY sort_order ASC, created_at ASC
            "#,
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(images)
    }

    pub async fn create_product_image<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        payload: &CreateProductImagePayload,
    ) -> Result<ProductImage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let image = sqlx::query_as::<_, ProductImage>(
            r#"
            INSERT INTO product_images (product_id, image_url, alt_text, is_primary, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(&payload.image_url)
        .bind(&payload.alt_text)
        .bind(payload.is_primary)
        .bind(payload.sort_order)
        .fetch_one(executor)
        .await?;
        Ok(image)
    }

    // O product_id no WHERE garante que não se apaga imagem de outro produto.
    pub async fn delete_product_image<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM product_images WHERE id = $1 AND product_id = $2",
        )
        .bind(image_id)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Variantes do produto
    // ---

    pub async fn get_product_variants<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<ProductVariant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let variants = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT * FROM product_variants
            WHERE product_id = $1
            ORDER BY sort_order ASC, created_at ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(variants)
    }

    pub async fn get_variants_for_products<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
    ) -> Result<Vec<ProductVariant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let variants = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT * FROM product_variants
            WHERE product_id = ANY($1)
            ORDER BY sort_order ASC, created_at ASC
            "#,
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(variants)
    }

    pub async fn create_product_variant<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        payload: &ProductVariantPayload,
    ) -> Result<ProductVariant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r#"
            INSERT INTO product_variants (product_id, color_name, color_code, images, is_default, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(&payload.color_name)
        .bind(&payload.color_code)
        .bind(&payload.images)
        .bind(payload.is_default)
        .bind(payload.sort_order)
        .fetch_one(executor)
        .await?;
        Ok(variant)
    }

    // A variante é sempre reenviada por inteiro, então sobrescrevemos tudo.
    pub async fn update_product_variant<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        variant_id: Uuid,
        payload: &ProductVariantPayload,
    ) -> Result<Option<ProductVariant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r#"
            UPDATE product_variants SET
                color_name = $3,
                color_code = $4,
                images = $5,
                is_default = $6,
                sort_order = $7
            WHERE id = $1 AND product_id = $2
            RETURNING *
            "#,
        )
        .bind(variant_id)
        .bind(product_id)
        .bind(&payload.color_name)
        .bind(&payload.color_code)
        .bind(&payload.images)
        .bind(payload.is_default)
        .bind(payload.sort_order)
        .fetch_optional(executor)
        .await?;
        Ok(variant)
    }

    pub async fn delete_product_variant<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        variant_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM product_variants WHERE id = $1 AND product_id = $2",
        )
        .bind(variant_id)
        .bind(product_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
