// src/services/pricing_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CaratAvailabilityRepository, CaratPricingRepository, CatalogRepository},
    models::pricing::{
        CaratOfferingEntry, CaratPricing, CreateCaratPricingPayload, PriceBreakdown,
        ProductCaratAvailability, UpdateCaratPricingPayload,
    },
};

// ---
// Motor de preços (função pura)
// ---

/// Calcula o detalhamento de preço para um peso de quilate.
///
/// Sem multiplicador cadastrado assume 1.0: a política é nunca bloquear
/// uma venda por falta de metadado de preço. Os valores finais saem
/// fixados em 2 casas decimais.
pub fn price_breakdown(
    base_price: Decimal,
    carat_weight: Decimal,
    multiplier: Option<Decimal>,
    discount_percentage: Decimal,
) -> PriceBreakdown {
    let price_multiplier = multiplier.unwrap_or(Decimal::ONE);
    let calculated_price = (base_price * price_multiplier).round_dp(2);
    let discount_factor = Decimal::ONE - discount_percentage / Decimal::ONE_HUNDRED;
    let final_price = (calculated_price * discount_factor).round_dp(2);

    PriceBreakdown {
        base_price,
        carat_weight,
        price_multiplier,
        calculated_price,
        discount_percentage,
        final_price,
    }
}

// ---
// Validação estrutural do lote de oferta
// ---

/// Valida um lote de substituição de oferta antes de qualquer escrita.
///
/// Mais de um padrão é erro do cliente e derruba o lote inteiro: escolher
/// um em silêncio esconderia o bug de quem chamou. Zero padrões é legal
/// (produto fica sem pré-seleção).
pub fn validate_offering(entries: &[CaratOfferingEntry]) -> Result<(), AppError> {
    let defaults = entries.iter().filter(|e| e.is_default).count();
    if defaults > 1 {
        return Err(AppError::InvalidOffering(
            "mais de um peso marcado como padrão".into(),
        ));
    }

    for entry in entries {
        if entry.carat_weight <= Decimal::ZERO {
            return Err(AppError::InvalidOffering(format!(
                "peso de quilate deve ser positivo, recebido {}",
                entry.carat_weight
            )));
        }
    }

    for (i, entry) in entries.iter().enumerate() {
        if entries[..i]
            .iter()
            .any(|prev| prev.carat_weight == entry.carat_weight)
        {
            return Err(AppError::InvalidOffering(format!(
                "peso de quilate duplicado: {}",
                entry.carat_weight
            )));
        }
    }

    Ok(())
}

// Seleção padrão dentre as linhas disponíveis (já filtradas e ordenadas).
fn default_carat(rows: &[ProductCaratAvailability]) -> Option<Decimal> {
    rows.iter().find(|r| r.is_default).map(|r| r.carat_weight)
}

// O peso só é vendável se tiver linha disponível na oferta do produto,
// mesmo que exista na tabela global de multiplicadores.
fn is_weight_offered(rows: &[ProductCaratAvailability], carat_weight: Decimal) -> bool {
    rows.iter().any(|r| r.carat_weight == carat_weight)
}

// ---
// Fachada: compõe tabela global + oferta por produto + motor puro
// ---

#[derive(Clone)]
pub struct PricingService {
    pricing_repo: CaratPricingRepository,
    availability_repo: CaratAvailabilityRepository,
    catalog_repo: CatalogRepository,
    pool: PgPool,
}

impl PricingService {
    pub fn new(
        pricing_repo: CaratPricingRepository,
        availability_repo: CaratAvailabilityRepository,
        catalog_repo: CatalogRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            pricing_repo,
            availability_repo,
            catalog_repo,
            pool,
        }
    }

    // ---
    // Tabela global de multiplicadores
    // ---

    pub async fn list_pricing_table(&self) -> Result<Vec<CaratPricing>, AppError> {
        self.pricing_repo.get_all_active(&self.pool).await
    }

    pub async fn find_pricing_by_weight(
        &self,
        carat_weight: Decimal,
    ) -> Result<CaratPricing, AppError> {
        self.pricing_repo
            .find_by_weight(&self.pool, carat_weight)
            .await?
            .ok_or(AppError::CaratPricingNotFound)
    }

    pub async fn create_pricing_entry(
        &self,
        payload: &CreateCaratPricingPayload,
    ) -> Result<CaratPricing, AppError> {
        self.pricing_repo.create(&self.pool, payload).await
    }

    pub async fn update_pricing_entry(
        &self,
        id: i64,
        payload: &UpdateCaratPricingPayload,
    ) -> Result<CaratPricing, AppError> {
        self.pricing_repo.update(&self.pool, id, payload).await
    }

    pub async fn delete_pricing_entry(&self, id: i64) -> Result<(), AppError> {
        self.pricing_repo.delete(&self.pool, id).await
    }

    // ---
    // Oferta de quilates por produto
    // ---

    pub async fn list_available(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ProductCaratAvailability>, AppError> {
        self.catalog_repo
            .get_product(&self.pool, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        self.availability_repo
            .list_available(&self.pool, product_id)
            .await
    }

    pub async fn get_default_selection(
        &self,
        product_id: Uuid,
    ) -> Result<Option<Decimal>, AppError> {
        let rows = self.list_available(product_id).await?;
        Ok(default_carat(&rows))
    }

    /// Substituição atômica da oferta inteira de um produto.
    ///
    /// A transação trava a linha do produto, então edições concorrentes
    /// da oferta do mesmo produto serializam; produtos diferentes nunca
    /// disputam. Um lote rejeitado não altera nada.
    pub async fn replace_offering(
        &self,
        product_id: Uuid,
        entries: &[CaratOfferingEntry],
    ) -> Result<Vec<ProductCaratAvailability>, AppError> {
        validate_offering(entries)?;

        let mut tx = self.pool.begin().await?;

        self.catalog_repo
            .get_product_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        self.availability_repo
            .delete_for_product(&mut *tx, product_id)
            .await?;

        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let row = self
                .availability_repo
                .insert_entry(&mut *tx, product_id, entry)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// Define o peso padrão do produto em dois passos (zera todos, marca um)
    /// dentro de uma única transação. Nenhum leitor observa dois padrões
    /// nem um estado intermediário sem padrão.
    pub async fn set_default(
        &self,
        product_id: Uuid,
        carat_weight: Decimal,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.catalog_repo
            .get_product_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        self.availability_repo
            .clear_default(&mut *tx, product_id)
            .await?;

        let matched = self
            .availability_repo
            .mark_default(&mut *tx, product_id, carat_weight)
            .await?;

        if matched == 0 {
            // O drop da transação faz rollback: o padrão anterior volta.
            return Err(AppError::CaratRowNotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    // ---
    // Cálculo de preço para a vitrine
    // ---

    /// Preço vendável de um produto em um peso de quilate.
    ///
    /// O peso precisa estar na oferta disponível do produto; ter entrada
    /// na tabela global não basta.
    pub async fn compute_price(
        &self,
        product_id: Uuid,
        carat_weight: Decimal,
    ) -> Result<PriceBreakdown, AppError> {
        let product = self
            .catalog_repo
            .get_product(&self.pool, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let offered = self
            .availability_repo
            .list_available(&self.pool, product_id)
            .await?;

        if !is_weight_offered(&offered, carat_weight) {
            return Err(AppError::UnavailableCarat);
        }

        let multiplier = self
            .pricing_repo
            .lookup_multiplier(&self.pool, carat_weight)
            .await?;

        Ok(price_breakdown(
            product.base_price,
            carat_weight,
            multiplier,
            product.discount_percentage,
        ))
    }
}

// ---
// Testes da parte pura do motor
// ---

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn entry(weight: &str, is_default: bool) -> CaratOfferingEntry {
        CaratOfferingEntry {
            carat_weight: dec(weight),
            is_available: true,
            is_default,
            sort_order: 0,
        }
    }

    fn row(id: i64, weight: &str, is_default: bool) -> ProductCaratAvailability {
        ProductCaratAvailability {
            id,
            product_id: Uuid::new_v4(),
            carat_weight: dec(weight),
            is_available: true,
            is_default,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn breakdown_is_idempotent() {
        let a = price_breakdown(dec("8500"), dec("1.5"), Some(dec("1.45")), dec("10"));
        let b = price_breakdown(dec("8500"), dec("1.5"), Some(dec("1.45")), dec("10"));
        assert_eq!(a, b);
    }

    #[test]
    fn breakdown_echoes_every_input() {
        let result = price_breakdown(dec("200"), dec("2.0"), Some(dec("1.8")), dec("5"));
        assert_eq!(result.base_price, dec("200"));
        assert_eq!(result.carat_weight, dec("2.0"));
        assert_eq!(result.price_multiplier, dec("1.8"));
        assert_eq!(result.discount_percentage, dec("5"));
    }

    #[test]
    fn missing_multiplier_falls_back_to_one() {
        let result = price_breakdown(dec("8500"), dec("2.7"), None, dec("0"));
        assert_eq!(result.price_multiplier, Decimal::ONE);
        assert_eq!(result.calculated_price, dec("8500"));
        assert_eq!(result.final_price, dec("8500"));
    }

    #[test]
    fn discount_zero_keeps_calculated_price() {
        let result = price_breakdown(dec("1000"), dec("1.0"), Some(dec("1.2")), dec("0"));
        assert_eq!(result.final_price, result.calculated_price);
    }

    #[test]
    fn full_discount_zeroes_final_price() {
        let result = price_breakdown(dec("1000"), dec("1.0"), Some(dec("1.2")), dec("100"));
        assert_eq!(result.final_price, Decimal::ZERO);
    }

    #[test]
    fn discount_law_holds() {
        let result = price_breakdown(dec("200"), dec("1.0"), Some(dec("1.0")), dec("25"));
        assert_eq!(result.calculated_price, dec("200"));
        assert_eq!(result.final_price, dec("150"));
    }

    // Tabela {1.0 -> 1.0, 1.5 -> 1.45}, base 8500, sem desconto.
    #[test]
    fn solitaire_at_one_and_a_half_carat() {
        let result = price_breakdown(dec("8500"), dec("1.5"), Some(dec("1.45")), dec("0"));
        assert_eq!(result.calculated_price, dec("12325.00"));
        assert_eq!(result.final_price, dec("12325.00"));
    }

    #[test]
    fn solitaire_with_ten_percent_off() {
        let result = price_breakdown(dec("8500"), dec("1.5"), Some(dec("1.45")), dec("10"));
        assert_eq!(result.final_price, dec("11092.50"));
    }

    #[test]
    fn offering_rejects_two_defaults() {
        let entries = vec![entry("1.0", true), entry("1.5", true)];
        let err = validate_offering(&entries).unwrap_err();
        assert!(matches!(err, AppError::InvalidOffering(_)));
    }

    #[test]
    fn offering_rejects_duplicate_weights() {
        // 1.5 e 1.50 são o mesmo valor numérico.
        let entries = vec![entry("1.5", true), entry("1.50", false)];
        let err = validate_offering(&entries).unwrap_err();
        assert!(matches!(err, AppError::InvalidOffering(_)));
    }

    #[test]
    fn offering_rejects_non_positive_weight() {
        let entries = vec![entry("0", false)];
        let err = validate_offering(&entries).unwrap_err();
        assert!(matches!(err, AppError::InvalidOffering(_)));
    }

    #[test]
    fn offering_without_default_is_legal() {
        let entries = vec![entry("1.0", false), entry("1.5", false)];
        assert!(validate_offering(&entries).is_ok());

        let single = vec![entry("1.0", true)];
        assert!(validate_offering(&single).is_ok());
    }

    #[test]
    fn default_selection_finds_flagged_row() {
        let rows = vec![row(1, "1.0", true), row(2, "1.5", false)];
        assert_eq!(default_carat(&rows), Some(dec("1.0")));

        let none = vec![row(1, "1.0", false), row(2, "1.5", false)];
        assert_eq!(default_carat(&none), None);
    }

    #[test]
    fn weight_outside_offering_is_not_sellable() {
        // 3.0 pode existir na tabela global, mas não está na oferta.
        let rows = vec![row(1, "1.0", true), row(2, "1.5", false)];
        assert!(!is_weight_offered(&rows, dec("3.0")));
        assert!(is_weight_offered(&rows, dec("1.5")));
        // Representação com escala diferente continua sendo o mesmo peso.
        assert!(is_weight_offered(&rows, dec("1.50")));
    }
}
