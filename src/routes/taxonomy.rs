use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::taxonomy::{BrandList, CategoryList, TeaCategoryList},
    error::AppResult,
    response::ApiResponse,
    services::catalog_service,
    state::AppState,
};

pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

pub fn tea_categories_router() -> Router<AppState> {
    Router::new().route("/", get(list_tea_categories))
}

pub fn brands_router() -> Router<AppState> {
    Router::new().route("/", get(list_brands))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, description = "All categories", body = ApiResponse<CategoryList>)),
    tag = "Taxonomy"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    Ok(Json(catalog_service::list_categories(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/tea-categories",
    responses((status = 200, description = "All tea categories", body = ApiResponse<TeaCategoryList>)),
    tag = "Taxonomy"
)]
pub async fn list_tea_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<TeaCategoryList>>> {
    Ok(Json(catalog_service::list_tea_categories(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    responses((status = 200, description = "All brands", body = ApiResponse<BrandList>)),
    tag = "Taxonomy"
)]
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<ApiResponse<BrandList>>> {
    Ok(Json(catalog_service::list_brands(&state).await?))
}
