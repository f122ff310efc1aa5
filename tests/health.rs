mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::State,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use tea_storefront_api::{
    app::build_app, middleware::auth::issue_token, routes::health::health_check,
};
use tower::ServiceExt;

fn app() -> Router {
    build_app(common::lazy_state())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_check_returns_ok_without_database() {
    let response = health_check(State(common::lazy_state())).await;
    assert_eq!(response.0.message, "Health check");

    let data = serde_json::to_value(response.0.data.expect("health data")).expect("json");
    assert_eq!(data["status"], "ok");
    assert_eq!(data["database"], "unavailable");
}

#[tokio::test]
async fn unknown_paths_get_the_json_envelope_and_a_request_id() {
    let response = app()
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/nope");
}

#[tokio::test]
async fn empty_cart_is_served_with_a_fresh_cookie() {
    let response = app()
        .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie")
        .to_string();
    assert!(cookie.starts_with("cart="));
    assert!(cookie.contains("SameSite=Lax"));

    let body = body_json(response).await;
    assert_eq!(body["data"]["items"], serde_json::json!([]));
    assert_eq!(body["data"]["totals"]["total"], 0);
}

#[tokio::test]
async fn unreadable_cart_cookie_reads_as_empty() {
    let response = app()
        .oneshot(
            Request::get("/api/cart")
                .header(header::COOKIE, "theme=dark; cart=%%%not-base64")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"], serde_json::json!([]));
}

#[tokio::test]
async fn clearing_the_cart_honours_the_secure_cookie_setting() {
    let mut state = common::lazy_state();
    let mut config = (*state.config).clone();
    config.cart_cookie_secure = true;
    state.config = Arc::new(config);

    let response = build_app(state)
        .oneshot(Request::delete("/api/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie")
        .to_string();
    assert!(cookie.starts_with("cart="));
    assert!(cookie.ends_with("; Secure"));
}

#[tokio::test]
async fn removing_a_missing_line_is_a_bad_request() {
    let payload = serde_json::json!({ "product_id": uuid::Uuid::new_v4() });
    let response = app()
        .oneshot(
            Request::delete("/api/cart/items")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_with_empty_cart_is_rejected() {
    let payload = serde_json::json!({
        "customer_name": "Jana Novakova",
        "email": "jana@example.com",
        "shipping_address": {
            "name": "Jana Novakova",
            "street": "Dlouha 1",
            "city": "Praha",
            "postal_code": "11000",
            "country": "CZ"
        }
    });
    let response = app()
        .oneshot(
            Request::post("/api/orders")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Bad Request Cart is empty");
}

#[tokio::test]
async fn admin_routes_require_an_admin_token() {
    let response = app()
        .oneshot(Request::get("/api/admin/orders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = issue_token(
        common::JWT_SECRET,
        "someone@example.com",
        "customer",
        chrono::Duration::hours(1),
    )
    .unwrap();
    let response = app()
        .oneshot(
            Request::get("/api/admin/orders")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
