use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod blog;
pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod taxonomy;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/catalog", products::catalog_router())
        .nest("/categories", taxonomy::categories_router())
        .nest("/tea-categories", taxonomy::tea_categories_router())
        .nest("/brands", taxonomy::brands_router())
        .nest("/blog", blog::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
}
