use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{delete, get},
};

use crate::{
    dto::cart::{AddCartItemRequest, CartView, RemoveCartItemRequest, UpdateCartItemRequest},
    error::AppResult,
    middleware::cart_cookie::{CartCookie, cart_set_cookie},
    response::ApiResponse,
    services::cart_service::{self, CartOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).delete(clear_cart))
        .route(
            "/items",
            delete(remove_item).post(add_item).patch(update_item),
        )
}

/// Every cart response rewrites the cookie with the cart it describes.
fn respond(secure: bool, outcome: CartOutcome) -> AppResult<impl IntoResponse> {
    let cookie = cart_set_cookie(&outcome.cart, secure)?;
    Ok(([(header::SET_COOKIE, cookie)], Json(outcome.response)))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart re-validated against current stock", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    CartCookie(cart): CartCookie,
) -> AppResult<impl IntoResponse> {
    let outcome = cart_service::view_cart(&state, cart).await?;
    respond(state.config.cart_cookie_secure, outcome)
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartView>),
        (status = 400, description = "Insufficient stock or unknown product")
    ),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    CartCookie(cart): CartCookie,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = cart_service::add_item(&state, cart, payload).await?;
    respond(state.config.cart_cookie_secure, outcome)
}

#[utoipa::path(
    patch,
    path = "/api/cart/items",
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity changed; zero removes the line", body = ApiResponse<CartView>),
        (status = 400, description = "Insufficient stock or item not in cart")
    ),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    CartCookie(cart): CartCookie,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = cart_service::update_item(&state, cart, payload).await?;
    respond(state.config.cart_cookie_secure, outcome)
}

#[utoipa::path(
    delete,
    path = "/api/cart/items",
    request_body = RemoveCartItemRequest,
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartView>),
        (status = 400, description = "Item not in cart")
    ),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    CartCookie(cart): CartCookie,
    Json(payload): Json<RemoveCartItemRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = cart_service::remove_item(cart, payload)?;
    respond(state.config.cart_cookie_secure, outcome)
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses((status = 200, description = "Cart emptied", body = ApiResponse<CartView>)),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    CartCookie(cart): CartCookie,
) -> AppResult<impl IntoResponse> {
    respond(state.config.cart_cookie_secure, cart_service::clear(cart))
}
