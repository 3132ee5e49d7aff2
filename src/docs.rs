// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catálogo ---
        handlers::catalog::get_categories,
        handlers::catalog::create_category,
        handlers::catalog::update_category,
        handlers::catalog::delete_category,
        handlers::catalog::get_products,
        handlers::catalog::get_featured_products,
        handlers::catalog::get_discounted_products,
        handlers::catalog::get_product,
        handlers::catalog::create_product,
        handlers::catalog::update_product,
        handlers::catalog::toggle_product_featured,
        handlers::catalog::delete_product,
        handlers::catalog::get_product_images,
        handlers::catalog::add_product_image,
        handlers::catalog::delete_product_image,
        handlers::catalog::get_product_variants,
        handlers::catalog::create_product_variant,
        handlers::catalog::update_product_variant,
        handlers::catalog::delete_product_variant,

        // --- Preços por quilate ---
        handlers::pricing::get_carat_pricing,
        handlers::pricing::get_carat_pricing_by_weight,
        handlers::pricing::create_carat_pricing,
        handlers::pricing::update_carat_pricing,
        handlers::pricing::delete_carat_pricing,
        handlers::pricing::get_product_carats,
        handlers::pricing::replace_product_carats,
        handlers::pricing::get_default_carat,
        handlers::pricing::set_default_carat,
        handlers::pricing::calculate_product_price,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo ---
            models::catalog::Category,
            models::catalog::Product,
            models::catalog::ProductImage,
            models::catalog::ProductVariant,
            models::catalog::ProductDetail,
            models::catalog::CreateCategoryPayload,
            models::catalog::UpdateCategoryPayload,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,
            models::catalog::CreateProductImagePayload,
            models::catalog::ProductVariantPayload,

            // --- Preços por quilate ---
            models::pricing::CaratPricing,
            models::pricing::ProductCaratAvailability,
            models::pricing::CaratOfferingEntry,
            models::pricing::PriceBreakdown,
            models::pricing::CreateCaratPricingPayload,
            models::pricing::UpdateCaratPricingPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Catalog", description = "Categorias, Produtos, Imagens e Variantes"),
        (name = "Pricing", description = "Tabela de Quilates, Oferta por Produto e Cálculo de Preço")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
