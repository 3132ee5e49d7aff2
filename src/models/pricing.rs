// src/models/pricing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- 1. Tabela global de multiplicadores ---
// Mapeia peso de quilate -> multiplicador do preço base. Não pertence a
// nenhum produto; a unicidade do peso vale só entre entradas ativas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaratPricing {
    pub id: i64,

    #[schema(example = 1.5)]
    pub carat_weight: Decimal,

    #[schema(example = 1.45)]
    pub price_multiplier: Decimal,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 2. Oferta de quilates por produto ---
// No máximo uma linha com is_default = true por produto.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCaratAvailability {
    pub id: i64,
    pub product_id: Uuid,

    #[schema(example = 1.5)]
    pub carat_weight: Decimal,

    pub is_available: bool,
    pub is_default: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

// --- 3. Entrada do lote de substituição da oferta ---
// A oferta de um produto é sempre editada como um lote completo
// (apaga tudo e insere de novo, numa transação).
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaratOfferingEntry {
    #[schema(example = 1.5)]
    pub carat_weight: Decimal,

    #[serde(default = "default_true")]
    pub is_available: bool,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub sort_order: i32,
}

pub(crate) fn default_true() -> bool {
    true
}

// --- 4. Resultado do cálculo de preço ---
// Devolvemos o detalhamento completo, não só o valor final, para que a
// vitrine possa exibir/auditar cada etapa do cálculo.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    #[schema(example = 8500.0)]
    pub base_price: Decimal,

    #[schema(example = 1.5)]
    pub carat_weight: Decimal,

    #[schema(example = 1.45)]
    pub price_multiplier: Decimal,

    #[schema(example = 12325.0)]
    pub calculated_price: Decimal,

    #[schema(example = 0.0)]
    pub discount_percentage: Decimal,

    #[schema(example = 12325.0)]
    pub final_price: Decimal,
}

// ---
// Validação Customizada para campos Decimal
// ---
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusiveMin".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_discount_range(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.add_param("max".into(), &100.0);
        err.message = Some("O desconto deve estar entre 0 e 100.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads da tabela global de multiplicadores
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCaratPricingPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 1.5)]
    pub carat_weight: Decimal,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = 1.45)]
    pub price_multiplier: Decimal,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaratPricingPayload {
    #[validate(custom(function = "validate_positive"))]
    pub carat_weight: Option<Decimal>,

    #[validate(custom(function = "validate_positive"))]
    pub price_multiplier: Option<Decimal>,

    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn positive_validator_rejects_zero_and_negative() {
        assert!(validate_positive(&dec("0")).is_err());
        assert!(validate_positive(&dec("-1.5")).is_err());
        assert!(validate_positive(&dec("0.01")).is_ok());
    }

    #[test]
    fn discount_validator_enforces_bounds() {
        assert!(validate_discount_range(&dec("0")).is_ok());
        assert!(validate_discount_range(&dec("100")).is_ok());
        assert!(validate_discount_range(&dec("100.01")).is_err());
        assert!(validate_discount_range(&dec("-0.01")).is_err());
    }
}
