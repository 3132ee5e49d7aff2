// src/handlers/pricing.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::pricing::{
        CaratOfferingEntry, CaratPricing, CreateCaratPricingPayload, PriceBreakdown,
        ProductCaratAvailability, UpdateCaratPricingPayload,
    },
};

// ---
// Tabela global de multiplicadores por quilate
// ---

// GET /api/carat-pricing
#[utoipa::path(
    get,
    path = "/api/carat-pricing",
    tag = "Pricing",
    responses(
        (status = 200, description = "Entradas ativas da tabela", body = Vec<CaratPricing>)
    )
)]
pub async fn get_carat_pricing(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.pricing_service.list_pricing_table().await?;
    Ok((StatusCode::OK, Json(entries)))
}

// GET /api/carat-pricing/weight/{carat_weight}
#[utoipa::path(
    get,
    path = "/api/carat-pricing/weight/{carat_weight}",
    tag = "Pricing",
    params(("carat_weight" = f64, Path, description = "Peso de quilate (ex.: 1.5)")),
    responses(
        (status = 200, description = "Entrada da tabela para o peso", body = CaratPricing),
        (status = 404, description = "Peso sem entrada ativa")
    )
)]
pub async fn get_carat_pricing_by_weight(
    State(app_state): State<AppState>,
    Path(carat_weight): Path<Decimal>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state
        .pricing_service
        .find_pricing_by_weight(carat_weight)
        .await?;
    Ok((StatusCode::OK, Json(entry)))
}

// POST /api/carat-pricing
#[utoipa::path(
    post,
    path = "/api/carat-pricing",
    tag = "Pricing",
    request_body = CreateCaratPricingPayload,
    responses(
        (status = 201, description = "Entrada criada", body = CaratPricing),
        (status = 409, description = "Peso já cadastrado entre entradas ativas")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_carat_pricing(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateCaratPricingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state
        .pricing_service
        .create_pricing_entry(&payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// PUT /api/carat-pricing/{id}
#[utoipa::path(
    put,
    path = "/api/carat-pricing/{id}",
    tag = "Pricing",
    request_body = UpdateCaratPricingPayload,
    params(("id" = i64, Path, description = "ID da entrada")),
    responses(
        (status = 200, description = "Entrada atualizada", body = CaratPricing),
        (status = 404, description = "Entrada não encontrada"),
        (status = 409, description = "Peso colidiria com outra entrada ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_carat_pricing(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCaratPricingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state
        .pricing_service
        .update_pricing_entry(id, &payload)
        .await?;
    Ok((StatusCode::OK, Json(entry)))
}

// DELETE /api/carat-pricing/{id}
#[utoipa::path(
    delete,
    path = "/api/carat-pricing/{id}",
    tag = "Pricing",
    params(("id" = i64, Path, description = "ID da entrada")),
    responses(
        (status = 200, description = "Entrada removida"),
        (status = 404, description = "Entrada não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_carat_pricing(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    app_state.pricing_service.delete_pricing_entry(id).await?;
    Ok((StatusCode::OK, Json(json!({ "message": "Entrada de tamanho de quilate removida com sucesso" }))))
}

// ---
// Oferta de quilates por produto
// ---

// GET /api/products/{product_id}/carats
#[utoipa::path(
    get,
    path = "/api/products/{product_id}/carats",
    tag = "Pricing",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Pesos disponíveis, em ordem de exibição", body = Vec<ProductCaratAvailability>),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product_carats(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let carats = app_state.pricing_service.list_available(product_id).await?;
    Ok((StatusCode::OK, Json(carats)))
}

// PUT /api/products/{product_id}/carats
// Substituição em lote: a oferta anterior é apagada e o lote inteiro
// inserido numa transação. Lote inválido não altera nada.
#[utoipa::path(
    put,
    path = "/api/products/{product_id}/carats",
    tag = "Pricing",
    request_body = Vec<CaratOfferingEntry>,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Oferta substituída", body = Vec<ProductCaratAvailability>),
        (status = 400, description = "Lote inválido (ex.: mais de um padrão)"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn replace_product_carats(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(product_id): Path<Uuid>,
    Json(entries): Json<Vec<CaratOfferingEntry>>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .pricing_service
        .replace_offering(product_id, &entries)
        .await?;
    Ok((StatusCode::OK, Json(rows)))
}

// GET /api/products/{product_id}/carats/default
#[utoipa::path(
    get,
    path = "/api/products/{product_id}/carats/default",
    tag = "Pricing",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Peso pré-selecionado (ou null se não houver)"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_default_carat(
    State(app_state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let default = app_state
        .pricing_service
        .get_default_selection(product_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "caratWeight": default }))))
}

// PUT /api/products/{product_id}/carats/{carat_weight}/set-default
#[utoipa::path(
    put,
    path = "/api/products/{product_id}/carats/{carat_weight}/set-default",
    tag = "Pricing",
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("carat_weight" = f64, Path, description = "Peso de quilate (ex.: 1.5)")
    ),
    responses(
        (status = 200, description = "Peso definido como padrão"),
        (status = 404, description = "Produto ou peso não cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_default_carat(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path((product_id, carat_weight)): Path<(Uuid, Decimal)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .pricing_service
        .set_default(product_id, carat_weight)
        .await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "message": format!("Quilate {} definido como padrão para o produto", carat_weight) })),
    ))
}

// ---
// Cálculo de preço
// ---

// GET /api/products/{product_id}/price/{carat_weight}
#[utoipa::path(
    get,
    path = "/api/products/{product_id}/price/{carat_weight}",
    tag = "Pricing",
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("carat_weight" = f64, Path, description = "Peso de quilate (ex.: 1.5)")
    ),
    responses(
        (status = 200, description = "Detalhamento completo do preço", body = PriceBreakdown),
        (status = 400, description = "Peso não disponível para este produto"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn calculate_product_price(
    State(app_state): State<AppState>,
    Path((product_id, carat_weight)): Path<(Uuid, Decimal)>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = app_state
        .pricing_service
        .compute_price(product_id, carat_weight)
        .await?;
    Ok((StatusCode::OK, Json(breakdown)))
}
