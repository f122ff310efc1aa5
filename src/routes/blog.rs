use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::blog::{BlogPostDetail, BlogPostList},
    error::AppResult,
    response::ApiResponse,
    routes::params::BlogQuery,
    services::blog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/{slug}", get(get_post))
}

#[utoipa::path(
    get,
    path = "/api/blog",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("tea_category" = Option<String>, Query, description = "Tea category slug")
    ),
    responses((status = 200, description = "Published posts", body = ApiResponse<BlogPostList>)),
    tag = "Blog"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> AppResult<Json<ApiResponse<BlogPostList>>> {
    let resp = blog_service::list_posts(&state, query, false).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/blog/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Published post", body = ApiResponse<BlogPostDetail>),
        (status = 404, description = "Not Found")
    ),
    tag = "Blog"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<BlogPostDetail>>> {
    let resp = blog_service::get_published_post(&state, &slug).await?;
    Ok(Json(resp))
}
