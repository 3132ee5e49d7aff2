// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{CaratAvailabilityRepository, CaratPricingRepository, CatalogRepository, UserRepository},
    services::{AuthService, CatalogService, PricingService},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub pricing_service: PricingService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar,
    // quem decide o que fazer é o main.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let pricing_repo = CaratPricingRepository::new(db_pool.clone());
        let availability_repo = CaratAvailabilityRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret, db_pool.clone());
        let catalog_service = CatalogService::new(
            catalog_repo.clone(),
            availability_repo.clone(),
            db_pool.clone(),
        );
        let pricing_service = PricingService::new(
            pricing_repo,
            availability_repo,
            catalog_repo,
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            auth_service,
            catalog_service,
            pricing_service,
        })
    }
}
