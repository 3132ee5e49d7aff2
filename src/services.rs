pub mod auth;
pub use auth::AuthService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod pricing_service;
pub use pricing_service::PricingService;
