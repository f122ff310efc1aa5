use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    dto::orders::{CheckoutRequest, OrderLookupQuery, OrderWithItems},
    error::AppResult,
    middleware::cart_cookie::{CartCookie, cart_clear_cookie},
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout))
        .route("/{order_number}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order placed; the cart cookie is cleared", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Empty cart, invalid details or insufficient stock")
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    CartCookie(cart): CartCookie,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<impl IntoResponse> {
    let resp = order_service::create_order(&state, &cart, payload).await?;
    let cookie = cart_clear_cookie(state.config.cart_cookie_secure)?;
    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_number}",
    params(
        ("order_number" = String, Path, description = "Order number, e.g. ORD-20261017-1a2b3c4d5e6f7a8b"),
        ("email" = String, Query, description = "Email the order was placed with")
    ),
    responses(
        (status = 200, description = "Order with items and addresses", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "No order with that number and email")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
    Query(query): Query<OrderLookupQuery>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = order_service::get_order_by_number(&state, &order_number, &query.email).await?;
    Ok(Json(resp))
}
