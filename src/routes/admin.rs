use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        blog::{BlogPostDetail, BlogPostList, CreateBlogPostRequest, UpdateBlogPostRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
        products::{
            CreateProductRequest, ProductDetail, ProductList, StockAdjustRequest,
            UpdateProductRequest,
        },
        taxonomy::{
            CreateBrandRequest, CreateCategoryRequest, CreateTeaCategoryRequest,
            UpdateBrandRequest, UpdateCategoryRequest, UpdateTeaCategoryRequest,
        },
    },
    error::AppResult,
    middleware::auth::AdminUser,
    models::{Brand, Category, Order, TeaCategory},
    response::ApiResponse,
    routes::params::{BlogQuery, OrderListQuery, ProductQuery},
    services::{admin_service, blog_service, product_service, taxonomy_service},
    state::AppState,
};

type Deleted = Json<ApiResponse<serde_json::Value>>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/stock", patch(adjust_stock))
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/tea-categories", post(create_tea_category))
        .route(
            "/tea-categories/{id}",
            put(update_tea_category).delete(delete_tea_category),
        )
        .route("/brands", post(create_brand))
        .route("/brands/{id}", put(update_brand).delete(delete_brand))
        .route("/blog", get(list_posts).post(create_post))
        .route(
            "/blog/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/payment", patch(update_payment_status))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name and description"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("brand" = Option<String>, Query, description = "Brand slug"),
        ("tea_category" = Option<String>, Query, description = "Tea category slug"),
        ("sort_by" = Option<String>, Query, description = "created_at, price, name"),
        ("sort_order" = Option<String>, Query, description = "asc, desc")
    ),
    responses(
        (status = 200, description = "All products including inactive ones", body = ApiResponse<ProductList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(product_service::list_products(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product with variations", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    Ok(Json(product_service::get_product(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDetail>),
        (status = 400, description = "Invalid product"),
        (status = 409, description = "Slug or SKU already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductDetail>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Slug or SKU already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    Ok(Json(
        product_service::update_product(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Deleted> {
    Ok(Json(product_service::delete_product(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/stock",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = StockAdjustRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<ProductDetail>),
        (status = 400, description = "Result would be negative or variation missing"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    Ok(Json(
        product_service::adjust_stock(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = taxonomy_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    Ok(Json(
        taxonomy_service::update_category(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted; its products lose the category"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Deleted> {
    Ok(Json(taxonomy_service::delete_category(&state, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/tea-categories",
    request_body = CreateTeaCategoryRequest,
    responses(
        (status = 201, description = "Tea category created", body = ApiResponse<TeaCategory>),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_tea_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CreateTeaCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TeaCategory>>)> {
    let resp = taxonomy_service::create_tea_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/tea-categories/{id}",
    params(("id" = Uuid, Path, description = "Tea category ID")),
    request_body = UpdateTeaCategoryRequest,
    responses(
        (status = 200, description = "Tea category updated", body = ApiResponse<TeaCategory>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_tea_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTeaCategoryRequest>,
) -> AppResult<Json<ApiResponse<TeaCategory>>> {
    Ok(Json(
        taxonomy_service::update_tea_category(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/tea-categories/{id}",
    params(("id" = Uuid, Path, description = "Tea category ID")),
    responses(
        (status = 200, description = "Tea category deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_tea_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Deleted> {
    Ok(Json(
        taxonomy_service::delete_tea_category(&state, &user, id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/admin/brands",
    request_body = CreateBrandRequest,
    responses(
        (status = 201, description = "Brand created", body = ApiResponse<Brand>),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CreateBrandRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Brand>>)> {
    let resp = taxonomy_service::create_brand(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    request_body = UpdateBrandRequest,
    responses(
        (status = 200, description = "Brand updated", body = ApiResponse<Brand>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_brand(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBrandRequest>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    Ok(Json(
        taxonomy_service::update_brand(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand ID")),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Deleted> {
    Ok(Json(taxonomy_service::delete_brand(&state, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/blog",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("tea_category" = Option<String>, Query, description = "Tea category slug")
    ),
    responses((status = 200, description = "Posts including drafts", body = ApiResponse<BlogPostList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<BlogQuery>,
) -> AppResult<Json<ApiResponse<BlogPostList>>> {
    Ok(Json(blog_service::list_posts(&state, query, true).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/blog/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post, published or not", body = ApiResponse<BlogPostDetail>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BlogPostDetail>>> {
    Ok(Json(blog_service::get_post(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/admin/blog",
    request_body = CreateBlogPostRequest,
    responses(
        (status = 201, description = "Post created", body = ApiResponse<BlogPostDetail>),
        (status = 409, description = "Slug already in use")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_post(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<CreateBlogPostRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BlogPostDetail>>)> {
    let resp = blog_service::create_post(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/blog/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdateBlogPostRequest,
    responses(
        (status = 200, description = "Post updated", body = ApiResponse<BlogPostDetail>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_post(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogPostRequest>,
) -> AppResult<Json<ApiResponse<BlogPostDetail>>> {
    Ok(Json(
        blog_service::update_post(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/admin/blog/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_post(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Deleted> {
    Ok(Json(blog_service::delete_post(&state, &user, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "All orders", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(admin_service::list_all_orders(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items and addresses", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    Ok(Json(admin_service::get_order_admin(&state, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(
        admin_service::update_order_status(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/payment",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid or unchanged payment status"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    Ok(Json(
        admin_service::update_payment_status(&state, &user, id, payload).await?,
    ))
}
