// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::catalog::{
        Category, CreateCategoryPayload, CreateProductImagePayload, CreateProductPayload,
        ProductDetail, ProductImage, ProductVariant, ProductVariantPayload,
        UpdateCategoryPayload, UpdateProductPayload,
    },
};

// ---
// Categorias
// ---

// GET /api/categories
#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Catalog",
    responses(
        (status = 200, description = "Categorias ativas", body = Vec<Category>)
    )
)]
pub async fn get_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_service.get_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

// POST /api/categories
#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Catalog",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Requer administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.catalog_service.create_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

// PUT /api/categories/{category_id}
#[utoipa::path(
    put,
    path = "/api/categories/{category_id}",
    tag = "Catalog",
    request_body = UpdateCategoryPayload,
    params(("category_id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let category = app_state
        .catalog_service
        .update_category(category_id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(category)))
}

// DELETE /api/categories/{category_id}
#[utoipa::path(
    delete,
    path = "/api/categories/{category_id}",
    tag = "Catalog",
    params(("category_id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria removida"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_category(category_id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Categoria removida com sucesso" }))))
}

// ---
// Produtos
// ---

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    // Filtro opcional por categoria
    pub category_id: Option<Uuid>,

    #[serde(default)]
    pub skip: i64,

    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeaturedQuery {
    #[serde(default = "default_featured_limit")]
    pub limit: i64,
}

fn default_featured_limit() -> i64 {
    6
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Catalog",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Produtos disponíveis (agregado completo)", body = Vec<ProductDetail>)
    )
)]
pub async fn get_products(
    State(app_state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .get_products(query.category_id, query.skip, query.limit)
        .await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/featured
#[utoipa::path(
    get,
    path = "/api/products/featured",
    tag = "Catalog",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Produtos em destaque", body = Vec<ProductDetail>)
    )
)]
pub async fn get_featured_products(
    State(app_state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .get_featured_products(query.limit)
        .await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/discounted
#[utoipa::path(
    get,
    path = "/api/products/discounted",
    tag = "Catalog",
    params(FeaturedQuery),
    responses(
        (status = 200, description = "Produtos com desconto", body = Vec<ProductDetail>)
    )
)]
pub async fn get_discounted_products(
    State(app_state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_service
        .get_discounted_products(query.limit)
        .await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/{product_id}
#[utoipa::path(
    get,
    path = "/api/products/{product_id}",
    tag = "Catalog",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto com relações", body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.catalog_service.get_product_detail(product_id).await?;
    Ok((StatusCode::OK, Json(product)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = ProductDetail),
        (status = 400, description = "Dados ou oferta de quilates inválidos"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.catalog_service.create_product(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/products/{product_id}
#[utoipa::path(
    put,
    path = "/api/products/{product_id}",
    tag = "Catalog",
    request_body = UpdateProductPayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = ProductDetail),
        (status = 400, description = "Dados ou oferta de quilates inválidos"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .update_product(product_id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

// PUT /api/products/{product_id}/featured
#[utoipa::path(
    put,
    path = "/api/products/{product_id}/featured",
    tag = "Catalog",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Destaque alternado", body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_product_featured(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .catalog_service
        .toggle_product_featured(product_id)
        .await?;
    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{product_id}
#[utoipa::path(
    delete,
    path = "/api/products/{product_id}",
    tag = "Catalog",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_product(product_id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Produto removido com sucesso" }))))
}

// ---
// Imagens do produto
// ---

// GET /api/products/{product_id}/images
#[utoipa::path(
    get,
    path = "/api/products/{product_id}/images",
    tag = "Catalog",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Imagens do produto", body = Vec<ProductImage>),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product_images(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let images = app_state.catalog_service.get_product_images(product_id).await?;
    Ok((StatusCode::OK, Json(images)))
}

// POST /api/products/{product_id}/images
#[utoipa::path(
    post,
    path = "/api/products/{product_id}/images",
    tag = "Catalog",
    request_body = CreateProductImagePayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 201, description = "Imagem adicionada", body = ProductImage),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_product_image(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<CreateProductImagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let image = app_state
        .catalog_service
        .add_product_image(product_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

// DELETE /api/products/{product_id}/images/{image_id}
#[utoipa::path(
    delete,
    path = "/api/products/{product_id}/images/{image_id}",
    tag = "Catalog",
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("image_id" = Uuid, Path, description = "ID da imagem")
    ),
    responses(
        (status = 200, description = "Imagem removida"),
        (status = 404, description = "Imagem não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product_image(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path((product_id, image_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_product_image(product_id, image_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Imagem removida com sucesso" }))))
}

// ---
// Variantes do produto
// ---

// GET /api/products/{product_id}/variants
#[utoipa::path(
    get,
    path = "/api/products/{product_id}/variants",
    tag = "Catalog",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Variantes do produto", body = Vec<ProductVariant>),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product_variants(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let variants = app_state
        .catalog_service
        .get_product_variants(product_id)
        .await?;
    Ok((StatusCode::OK, Json(variants)))
}

// POST /api/products/{product_id}/variants
#[utoipa::path(
    post,
    path = "/api/products/{product_id}/variants",
    tag = "Catalog",
    request_body = ProductVariantPayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 201, description = "Variante criada", body = ProductVariant),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product_variant(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<ProductVariantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let variant = app_state
        .catalog_service
        .create_product_variant(product_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

// PUT /api/products/{product_id}/variants/{variant_id}
#[utoipa::path(
    put,
    path = "/api/products/{product_id}/variants/{variant_id}",
    tag = "Catalog",
    request_body = ProductVariantPayload,
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("variant_id" = Uuid, Path, description = "ID da variante")
    ),
    responses(
        (status = 200, description = "Variante atualizada", body = ProductVariant),
        (status = 404, description = "Variante não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product_variant(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path((product_id, variant_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ProductVariantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let variant = app_state
        .catalog_service
        .update_product_variant(product_id, variant_id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(variant)))
}

// DELETE /api/products/{product_id}/variants/{variant_id}
#[utoipa::path(
    delete,
    path = "/api/products/{product_id}/variants/{variant_id}",
    tag = "Catalog",
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("variant_id" = Uuid, Path, description = "ID da variante")
    ),
    responses(
        (status = 200, description = "Variante removida"),
        (status = 404, description = "Variante não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product_variant(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path((product_id, variant_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .catalog_service
        .delete_product_variant(product_id, variant_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Variante removida com sucesso" }))))
}
