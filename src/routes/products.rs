use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};

use crate::{
    dto::products::{Catalog, ProductDetail, ProductList},
    error::AppResult,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{slug}", get(get_product))
}

pub fn catalog_router() -> Router<AppState> {
    Router::new().route("/", get(get_catalog))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("brand" = Option<String>, Query, description = "Brand slug"),
        ("tea_category" = Option<String>, Query, description = "Tea category slug"),
        ("min_price" = Option<i64>, Query, description = "Minimum price in minor units"),
        ("max_price" = Option<i64>, Query, description = "Maximum price in minor units"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, name"),
        ("sort_order" = Option<String>, Query, description = "asc, desc")
    ),
    responses(
        (status = 200, description = "Active products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_products(&state, query, false).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product with variations and availability", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Not Found")
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let resp = catalog_service::get_product_by_slug(&state, &slug).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog",
    responses(
        (status = 200, description = "Stock and price figures of every active product", body = ApiResponse<Catalog>)
    ),
    tag = "Products"
)]
pub async fn get_catalog(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let resp = catalog_service::catalog(&state).await?;
    let cache_control = format!("public, max-age={}", state.config.catalog_max_age_secs);
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(resp)))
}
