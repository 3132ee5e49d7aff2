// src/services/catalog_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CaratAvailabilityRepository, CatalogRepository},
    models::catalog::{
        Category, CreateCategoryPayload, CreateProductImagePayload, CreateProductPayload,
        Product, ProductDetail, ProductImage, ProductVariant, ProductVariantPayload,
        UpdateCategoryPayload, UpdateProductPayload,
    },
    services::pricing_service::validate_offering,
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    availability_repo: CaratAvailabilityRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(
        catalog_repo: CatalogRepository,
        availability_repo: CaratAvailabilityRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            catalog_repo,
            availability_repo,
            pool,
        }
    }

    // ---
    // Categorias
    // ---

    pub async fn get_categories(&self) -> Result<Vec<Category>, AppError> {
        self.catalog_repo.get_categories(&self.pool).await
    }

    pub async fn create_category(
        &self,
        payload: &CreateCategoryPayload,
    ) -> Result<Category, AppError> {
        self.catalog_repo.create_category(&self.pool, payload).await
    }

    pub async fn update_category(
        &self,
        category_id: Uuid,
        payload: &UpdateCategoryPayload,
    ) -> Result<Category, AppError> {
        self.catalog_repo
            .update_category(&self.pool, category_id, payload)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn delete_category(&self, category_id: Uuid) -> Result<(), AppError> {
        let deleted = self
            .catalog_repo
            .delete_category(&self.pool, category_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::CategoryNotFound);
        }
        Ok(())
    }

    // ---
    // Produtos (sempre devolvidos como agregado completo)
    // ---

    pub async fn get_products(
        &self,
        category_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, AppError> {
        // OFFSET/LIMIT negativos derrubariam a query no Postgres.
        let skip = skip.max(0);
        let limit = limit.clamp(1, 100);

        let products = self
            .catalog_repo
            .get_products(&self.pool, category_id, skip, limit)
            .await?;
        self.load_details(products).await
    }

    pub async fn get_featured_products(&self, limit: i64) -> Result<Vec<ProductDetail>, AppError> {
        let products = self
            .catalog_repo
            .get_featured_products(&self.pool, limit)
            .await?;
        self.load_details(products).await
    }

    pub async fn get_discounted_products(
        &self,
        limit: i64,
    ) -> Result<Vec<ProductDetail>, AppError> {
        let products = self
            .catalog_repo
            .get_discounted_products(&self.pool, limit)
            .await?;
        self.load_details(products).await
    }

    pub async fn get_product_detail(&self, product_id: Uuid) -> Result<ProductDetail, AppError> {
        let product = self
            .catalog_repo
            .get_product(&self.pool, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let mut details = self.load_details(vec![product]).await?;
        // load_details devolve um item por produto de entrada
        details.pop().ok_or(AppError::ProductNotFound)
    }

    /// Cria o produto e, se vier, a oferta inicial de quilates, tudo na
    /// mesma transação.
    pub async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<ProductDetail, AppError> {
        if let Some(entries) = &payload.available_carats {
            validate_offering(entries)?;
        }

        // A FK de categoria barraria de qualquer forma; checar antes dá um
        // 404 claro em vez de um 500 de violação de constraint.
        self.catalog_repo
            .get_category(&self.pool, payload.category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let mut tx = self.pool.begin().await?;

        let product = self.catalog_repo.create_product(&mut *tx, payload).await?;

        if let Some(entries) = &payload.available_carats {
            for entry in entries {
                self.availability_repo
                    .insert_entry(&mut *tx, product.id, entry)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_product_detail(product.id).await
    }

    /// Atualização parcial; se o payload trouxer a oferta, ela substitui a
    /// anterior por inteiro (mesma semântica do lote). O UPDATE do produto
    /// trava a linha, serializando com as outras edições de oferta.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<ProductDetail, AppError> {
        if let Some(entries) = &payload.available_carats {
            validate_offering(entries)?;
        }

        if let Some(category_id) = payload.category_id {
            self.catalog_repo
                .get_category(&self.pool, category_id)
                .await?
                .ok_or(AppError::CategoryNotFound)?;
        }

        let mut tx = self.pool.begin().await?;

        self.catalog_repo
            .update_product(&mut *tx, product_id, payload)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if let Some(entries) = &payload.available_carats {
            self.availability_repo
                .delete_for_product(&mut *tx, product_id)
                .await?;
            for entry in entries {
                self.availability_repo
                    .insert_entry(&mut *tx, product_id, entry)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_product_detail(product_id).await
    }

    pub async fn toggle_product_featured(
        &self,
        product_id: Uuid,
    ) -> Result<ProductDetail, AppError> {
        self.catalog_repo
            .toggle_product_featured(&self.pool, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        self.get_product_detail(product_id).await
    }

    pub async fn delete_product(&self, product_id: Uuid) -> Result<(), AppError> {
        let deleted = self
            .catalog_repo
            .delete_product(&self.pool, product_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    // ---
    // Imagens
    // ---

    pub async fn add_product_image(
        &self,
        product_id: Uuid,
        payload: &CreateProductImagePayload,
    ) -> Result<ProductImage, AppError> {
        self.ensure_product_exists(product_id).await?;
        self.catalog_repo
            .create_product_image(&self.pool, product_id, payload)
            .await
    }

    pub async fn get_product_images(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ProductImage>, AppError> {
        self.ensure_product_exists(product_id).await?;
        self.catalog_repo
            .get_product_images(&self.pool, product_id)
            .await
    }

    pub async fn delete_product_image(
        &self,
        product_id: Uuid,
        image_id: Uuid,
    ) -> Result<(), AppError> {
        let deleted = self
            .catalog_repo
            .delete_product_image(&self.pool, product_id, image_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::ImageNotFound);
        }
        Ok(())
    }

    // ---
    // Variantes
    // ---

    pub async fn create_product_variant(
        &self,
        product_id: Uuid,
        payload: &ProductVariantPayload,
    ) -> Result<ProductVariant, AppError> {
        self.ensure_product_exists(product_id).await?;
        self.catalog_repo
            .create_product_variant(&self.pool, product_id, payload)
            .await
    }

    pub async fn get_product_variants(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ProductVariant>, AppError> {
        self.ensure_product_exists(product_id).await?;
        self.catalog_repo
            .get_product_variants(&self.pool, product_id)
            .await
    }

    pub async fn update_product_variant(
        &self,
        product_id: Uuid,
        variant_id: Uuid,
        payload: &ProductVariantPayload,
    ) -> Result<ProductVariant, AppError> {
        self.catalog_repo
            .update_product_variant(&self.pool, product_id, variant_id, payload)
            .await?
            .ok_or(AppError::VariantNotFound)
    }

    pub async fn delete_product_variant(
        &self,
        product_id: Uuid,
        variant_id: Uuid,
    ) -> Result<(), AppError> {
        let deleted = self
            .catalog_repo
            .delete_product_variant(&self.pool, product_id, variant_id)
            .await?;
        if deleted == 0 {
            return Err(AppError::VariantNotFound);
        }
        Ok(())
    }

    // ---
    // Montagem explícita do agregado
    // ---

    async fn ensure_product_exists(&self, product_id: Uuid) -> Result<(), AppError> {
        self.catalog_repo
            .get_product(&self.pool, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;
        Ok(())
    }

    // Carrega as relações de uma página inteira de produtos com uma busca
    // em lote por tabela e monta os agregados em memória. Nada de
    // lazy-load escondendo N+1.
    async fn load_details(&self, products: Vec<Product>) -> Result<Vec<ProductDetail>, AppError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let mut category_ids: Vec<Uuid> = products.iter().map(|p| p.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let categories = self
            .catalog_repo
            .get_categories_by_ids(&self.pool, &category_ids)
            .await?;
        let images = self
            .catalog_repo
            .get_images_for_products(&self.pool, &product_ids)
            .await?;
        let variants = self
            .catalog_repo
            .get_variants_for_products(&self.pool, &product_ids)
            .await?;
        let carats = self
            .availability_repo
            .list_available_for_products(&self.pool, &product_ids)
            .await?;

        let categories_by_id: HashMap<Uuid, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        let mut images_by_product: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
        for image in images {
            images_by_product
                .entry(image.product_id)
                .or_default()
                .push(image);
        }

        let mut variants_by_product: HashMap<Uuid, Vec<ProductVariant>> = HashMap::new();
        for variant in variants {
            variants_by_product
                .entry(variant.product_id)
                .or_default()
                .push(variant);
        }

        let mut carats_by_product: HashMap<Uuid, Vec<_>> = HashMap::new();
        for carat in carats {
            carats_by_product
                .entry(carat.product_id)
                .or_default()
                .push(carat);
        }

        let details = products
            .into_iter()
            .map(|product| {
                let category = categories_by_id.get(&product.category_id).cloned();
                let images = images_by_product.remove(&product.id).unwrap_or_default();
                let variants = variants_by_product.remove(&product.id).unwrap_or_default();
                let available_carats = carats_by_product.remove(&product.id).unwrap_or_default();

                ProductDetail {
                    product,
                    category,
                    images,
                    variants,
                    available_carats,
                }
            })
            .collect();

        Ok(details)
    }
}
