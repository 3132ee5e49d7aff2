//src/main.rs

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação. A checagem de admin das rotas de escrita do
    // catálogo fica nos extratores (AdminUser), não em camadas de middleware.
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::get_me));

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::get_categories).post(handlers::catalog::create_category),
        )
        .route(
            "/{category_id}",
            put(handlers::catalog::update_category).delete(handlers::catalog::delete_category),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::get_products).post(handlers::catalog::create_product),
        )
        .route("/featured", get(handlers::catalog::get_featured_products))
        .route("/discounted", get(handlers::catalog::get_discounted_products))
        .route(
            "/{product_id}",
            get(handlers::catalog::get_product)
                .put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        )
        .route(
            "/{product_id}/featured",
            put(handlers::catalog::toggle_product_featured),
        )
        .route(
            "/{product_id}/images",
            get(handlers::catalog::get_product_images).post(handlers::catalog::add_product_image),
        )
        .route(
            "/{product_id}/images/{image_id}",
            delete(handlers::catalog::delete_product_image),
        )
        .route(
            "/{product_id}/variants",
            get(handlers::catalog::get_product_variants)
                .post(handlers::catalog::create_product_variant),
        )
        .route(
            "/{product_id}/variants/{variant_id}",
            put(handlers::catalog::update_product_variant)
                .delete(handlers::catalog::delete_product_variant),
        )
        // A oferta de quilates é editada sempre como lote completo (PUT).
        .route(
            "/{product_id}/carats",
            get(handlers::pricing::get_product_carats)
                .put(handlers::pricing::replace_product_carats),
        )
        .route(
            "/{product_id}/carats/default",
            get(handlers::pricing::get_default_carat),
        )
        .route(
            "/{product_id}/carats/{carat_weight}/set-default",
            put(handlers::pricing::set_default_carat),
        )
        .route(
            "/{product_id}/price/{carat_weight}",
            get(handlers::pricing::calculate_product_price),
        );

    let carat_pricing_routes = Router::new()
        .route(
            "/",
            get(handlers::pricing::get_carat_pricing).post(handlers::pricing::create_carat_pricing),
        )
        .route(
            "/weight/{carat_weight}",
            get(handlers::pricing::get_carat_pricing_by_weight),
        )
        .route(
            "/{id}",
            put(handlers::pricing::update_carat_pricing)
                .delete(handlers::pricing::delete_carat_pricing),
        );

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/products", product_routes)
        .nest("/api/carat-pricing", carat_pricing_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
