// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::pricing::{
    validate_discount_range, validate_not_negative, CaratOfferingEntry, ProductCaratAvailability,
};

// --- 1. Categorias ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,

    #[schema(example = "Anéis de Noivado")]
    pub name: String,

    pub description: Option<String>,
    pub image_url: Option<String>,
    pub hero_image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// --- 2. Produtos ---
// Esta struct é a linha "crua" da tabela; o agregado completo é ProductDetail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,

    #[schema(example = "Anel Solitário Clássico")]
    pub name: String,

    pub description: Option<String>,

    // Preço de referência no multiplicador 1.0 (entrada do motor de preços)
    #[schema(example = 8500.0)]
    pub base_price: Decimal,

    // Preço de exibição na vitrine (definido pelo admin)
    #[schema(example = 8500.0)]
    pub price: Decimal,

    pub image_url: Option<String>,

    // Peso de quilate exibido por padrão na listagem
    pub carat_weight: Option<Decimal>,

    #[schema(example = "E")]
    pub color_grade: Option<String>,

    #[schema(example = "VS1")]
    pub clarity_grade: Option<String>,

    #[schema(example = "Excellent")]
    pub cut_grade: Option<String>,

    #[schema(example = "Round")]
    pub shape: Option<String>,

    pub certificate_number: Option<String>,
    pub is_available: bool,
    pub is_featured: bool,

    #[schema(example = 10.0)]
    pub discount_percentage: Decimal,

    pub created_at: DateTime<Utc>,
}

// --- 3. Imagens do produto ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
    pub alt_text: Option<String>,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

// --- 4. Variantes de cor/estilo ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,

    #[schema(example = "Ouro Rosé")]
    pub color_name: String,

    // Código hexadecimal usado pela UI
    #[schema(example = "#B76E79")]
    pub color_code: String,

    // URLs das imagens específicas desta variante
    pub images: Option<Vec<String>>,

    pub is_default: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

// --- 5. Agregado completo ---
// Carregado com buscas explícitas (produto + relações), nada de lazy-load.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,

    pub category: Option<Category>,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    pub available_carats: Vec<ProductCaratAvailability>,
}

// ---
// Payloads de Categoria
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Anéis de Noivado")]
    pub name: String,

    pub description: Option<String>,
    pub image_url: Option<String>,
    pub hero_image_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub hero_image_url: Option<String>,
    pub is_active: Option<bool>,
}

// ---
// Payloads de Produto
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub category_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Anel Solitário Clássico")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 8500.0)]
    pub base_price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 8500.0)]
    pub price: Decimal,

    pub image_url: Option<String>,
    pub carat_weight: Option<Decimal>,
    pub color_grade: Option<String>,
    pub clarity_grade: Option<String>,
    pub cut_grade: Option<String>,
    pub shape: Option<String>,
    pub certificate_number: Option<String>,

    #[serde(default)]
    pub is_featured: bool,

    // Se o JSON não tiver esse campo, assume 0
    #[serde(default)]
    #[validate(custom(function = "validate_discount_range"))]
    pub discount_percentage: Decimal,

    // Oferta inicial de quilates (opcional); passa pela mesma validação
    // do lote de substituição.
    pub available_carats: Option<Vec<CaratOfferingEntry>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Option<Decimal>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    pub image_url: Option<String>,
    pub carat_weight: Option<Decimal>,
    pub color_grade: Option<String>,
    pub clarity_grade: Option<String>,
    pub cut_grade: Option<String>,
    pub shape: Option<String>,
    pub certificate_number: Option<String>,
    pub is_available: Option<bool>,
    pub is_featured: Option<bool>,

    #[validate(custom(function = "validate_discount_range"))]
    pub discount_percentage: Option<Decimal>,

    // Se presente, substitui a oferta inteira (mesmo caminho do lote).
    pub available_carats: Option<Vec<CaratOfferingEntry>>,
}

// ---
// Payloads de Imagem e Variante
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductImagePayload {
    #[validate(length(min = 1, message = "A URL da imagem é obrigatória."))]
    #[schema(example = "/uploads/anel-solitario-01.webp")]
    pub image_url: String,

    pub alt_text: Option<String>,

    #[serde(default)]
    pub is_primary: bool,

    #[serde(default)]
    pub sort_order: i32,
}

// Usado tanto na criação quanto na atualização (a variante é sempre
// enviada por inteiro).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantPayload {
    #[validate(length(min = 1, message = "O nome da cor é obrigatório."))]
    #[schema(example = "Ouro Rosé")]
    pub color_name: String,

    #[validate(length(min = 1, message = "O código da cor é obrigatório."))]
    #[schema(example = "#B76E79")]
    pub color_code: String,

    pub images: Option<Vec<String>>,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub sort_order: i32,
}
