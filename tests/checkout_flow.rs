mod common;

use sea_orm::EntityTrait;
use tea_storefront_api::{
    cart::{Cart, CartAdjustment},
    dto::{
        cart::AddCartItemRequest,
        orders::{AddressInput, CheckoutRequest, UpdateOrderStatusRequest, UpdatePaymentStatusRequest},
        products::{AttributeInput, CreateProductRequest, VariationInput},
        taxonomy::CreateCategoryRequest,
    },
    entity::products::Entity as Products,
    error::AppError,
    services::{admin_service, cart_service, order_service, product_service, taxonomy_service},
};
use uuid::Uuid;

fn checkout_request(email: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Jana Novakova".into(),
        email: email.into(),
        phone: Some("+420 777 000 111".into()),
        note: None,
        shipping_address: AddressInput {
            name: "Jana Novakova".into(),
            street: "Dlouha 1".into(),
            city: "Praha".into(),
            postal_code: "11000".into(),
            country: "CZ".into(),
        },
        billing_address: None,
    }
}

fn product_request(name: &str, category_id: Uuid) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        slug: None,
        description: None,
        price: 10_000,
        stock: 0,
        unlimited_stock: false,
        weight_g: None,
        discount: None,
        shipping_from: None,
        image_url: None,
        active: None,
        category_id: Some(category_id),
        brand_id: None,
        tea_category_id: None,
        variations: Vec::new(),
    }
}

fn weighted(sku: &str, price: i64, grams: i32) -> VariationInput {
    VariationInput {
        sku: sku.into(),
        price,
        stock: 0,
        sort_order: 0,
        discount: None,
        shipping_from: None,
        attributes: vec![AttributeInput {
            key: "WEIGHT_G".into(),
            value: grams.to_string(),
        }],
    }
}

fn add(product_id: Uuid, variation_id: Option<Uuid>, quantity: u32) -> AddCartItemRequest {
    AddCartItemRequest {
        product_id,
        variation_id,
        quantity,
    }
}

// Cart -> checkout -> stock decremented; admin then moves the order along.
#[tokio::test]
async fn checkout_decrements_stock_and_admin_updates_order() -> anyhow::Result<()> {
    let Some(state) = common::db_state().await? else {
        return Ok(());
    };
    let admin = common::admin();

    let category = taxonomy_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Teaware".into(),
            slug: None,
            description: None,
            unlimited_stock: false,
        },
    )
    .await?
    .data
    .expect("category");

    let teapot = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            stock: 3,
            discount: Some(10),
            ..product_request("Kyusu Teapot", category.id)
        },
    )
    .await?
    .data
    .expect("teapot");
    let teapot_id = teapot.product.id;

    let sencha = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            weight_g: Some(300),
            variations: vec![weighted("S-50", 5_000, 50), weighted("S-100", 9_000, 100)],
            ..product_request("Sencha", category.id)
        },
    )
    .await?
    .data
    .expect("sencha");
    let sencha_id = sencha.product.id;
    let variation_of = |sku: &str| {
        sencha
            .variations
            .iter()
            .find(|v| v.sku == sku)
            .map(|v| v.id)
            .expect("variation")
    };
    let (small, large) = (variation_of("S-50"), variation_of("S-100"));

    let mut cart = Cart::default();
    for request in [
        add(teapot_id, None, 2),
        add(sencha_id, Some(large), 2),
        add(sencha_id, Some(small), 2),
    ] {
        cart = cart_service::add_item(&state, cart, request).await?.cart;
    }

    // 200 g + 100 g already use the whole 300 g pool.
    let over_pool = cart_service::add_item(&state, cart.clone(), add(sencha_id, Some(small), 1)).await;
    assert!(matches!(over_pool, Err(AppError::BadRequest(_))));
    let over_stock = cart_service::add_item(&state, cart.clone(), add(teapot_id, None, 2)).await;
    assert!(matches!(over_stock, Err(AppError::BadRequest(_))));

    let totals = cart.totals();
    assert_eq!(totals.subtotal, 48_000);
    assert_eq!(totals.total, 46_000);

    let placed = order_service::create_order(&state, &cart, checkout_request("jana@example.com"))
        .await?
        .data
        .expect("order");
    assert!(placed.order.order_number.starts_with("ORD-"));
    assert_eq!(placed.order.subtotal, 48_000);
    assert_eq!(placed.order.discount_total, 2_000);
    assert_eq!(placed.order.total_amount, 46_000);
    assert_eq!(placed.order.status, "pending");
    assert_eq!(placed.items.len(), 3);
    assert_eq!(placed.addresses.len(), 1);

    let (audited,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM audit_logs WHERE action = 'order_create'")
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(audited, 1);

    let teapot_row = Products::find_by_id(teapot_id).one(&state.orm).await?.expect("row");
    assert_eq!(teapot_row.stock, 1);
    let sencha_row = Products::find_by_id(sencha_id).one(&state.orm).await?.expect("row");
    assert_eq!(sencha_row.weight_g, Some(0));

    // Replaying the same cart must fail as a whole and leave stock untouched.
    let replay = order_service::create_order(&state, &cart, checkout_request("jana@example.com")).await;
    assert!(matches!(replay, Err(AppError::BadRequest(_))));
    let teapot_row = Products::find_by_id(teapot_id).one(&state.orm).await?.expect("row");
    assert_eq!(teapot_row.stock, 1);

    // The stale cart is trimmed to what is left.
    let refreshed = cart_service::view_cart(&state, cart.clone()).await?;
    assert_eq!(refreshed.cart.items.len(), 1);
    assert_eq!(refreshed.cart.items[0].quantity, 1);
    let view = refreshed.response.data.expect("view");
    assert!(view.adjustments.iter().any(|a| matches!(a, CartAdjustment::Reduced { from: 2, to: 1, .. })));
    assert!(view.adjustments.iter().any(|a| matches!(a, CartAdjustment::SoldOut { .. })));

    let number = placed.order.order_number.clone();
    let found = order_service::get_order_by_number(&state, &number, "JANA@example.com").await?;
    assert_eq!(found.data.expect("order").order.id, placed.order.id);
    let wrong = order_service::get_order_by_number(&state, &number, "eve@example.com").await;
    assert!(matches!(wrong, Err(AppError::NotFound)));

    let shipped = admin_service::update_order_status(
        &state,
        &admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await?;
    assert_eq!(shipped.data.expect("order").status, "shipped");

    let invalid = admin_service::update_order_status(
        &state,
        &admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: "lost".into(),
        },
    )
    .await;
    assert!(matches!(invalid, Err(AppError::BadRequest(_))));

    let paid = admin_service::update_payment_status(
        &state,
        &admin,
        placed.order.id,
        UpdatePaymentStatusRequest {
            payment_status: "paid".into(),
        },
    )
    .await?;
    assert_eq!(paid.data.expect("order").payment_status, "paid");
    let repeat = admin_service::update_payment_status(
        &state,
        &admin,
        placed.order.id,
        UpdatePaymentStatusRequest {
            payment_status: "paid".into(),
        },
    )
    .await;
    assert!(repeat.is_err());

    Ok(())
}
