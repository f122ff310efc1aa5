use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    cart::Cart,
    dto::orders::{AddressInput, CheckoutRequest, OrderWithItems},
    email::{OrderEmail, OrderEmailLine},
    entity::{
        addresses::{ActiveModel as AddressActive, Column as AddressCol, Entity as Addresses},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_variations::{Column as VariationCol, Entity as ProductVariations},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{Address, Order, OrderItem},
    pricing,
    response::{ApiResponse, Meta},
    services::{require_text, stock_service},
    state::AppState,
    stock,
};

pub const ADDRESS_SHIPPING: &str = "shipping";
pub const ADDRESS_BILLING: &str = "billing";

/// Turn the cart into an order.
///
/// Stock rows are locked for the whole transaction, so two checkouts for the
/// same goods are serialized and the second one sees the first one's decrement.
pub async fn create_order(
    state: &AppState,
    cart: &Cart,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    validate_checkout(cart, &payload)?;

    let txn = state.orm.begin().await?;

    let mut ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
    ids.sort();
    ids.dedup();
    let bundles = stock_service::load_bundles(&txn, &ids, true).await?;

    let order_id = Uuid::new_v4();
    let mut pending_items = Vec::with_capacity(cart.items.len());
    // product id -> grams taken from the pool
    let mut pool_usage: HashMap<Uuid, i64> = HashMap::new();
    let mut subtotal: i64 = 0;
    let mut total: i64 = 0;

    for (idx, line) in cart.items.iter().enumerate() {
        let bundle = bundles.get(&line.product_id).ok_or_else(|| {
            AppError::BadRequest(format!("{} is no longer available", line.name))
        })?;
        let product_stock = bundle.stock();
        let availability =
            stock::available_quantity(&product_stock, line.variation_id, &cart.items, Some(idx))?;
        if !availability.allows(line.quantity) {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}: only {} available",
                bundle.product.name,
                availability.cap().unwrap_or(0)
            )));
        }

        let (unit_price, discount) = bundle
            .price_of(line.variation_id)
            .ok_or_else(|| AppError::BadRequest("variation not found".into()))?;
        let line_total = pricing::line_total(unit_price, discount, line.quantity);
        subtotal += unit_price * i64::from(line.quantity);
        total += line_total;

        let variation = line.variation_id.and_then(|id| bundle.variation(id));
        if let (Some(_), Some(v)) = (product_stock.pooled_weight_g, variation) {
            if !product_stock.unlimited_stock {
                *pool_usage.entry(bundle.product.id).or_default() +=
                    i64::from(v.weight_g().unwrap_or(0)) * i64::from(line.quantity);
            }
        }

        let quantity = i32::try_from(line.quantity)
            .map_err(|_| AppError::BadRequest("quantity is too large".into()))?;
        pending_items.push(OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(bundle.product.id),
            variation_id: Set(line.variation_id),
            product_name: Set(bundle.product.name.clone()),
            sku: Set(variation.map(|v| v.variation.sku.clone())),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
            discount: Set(discount),
            line_total: Set(line_total),
            attributes: Set(serde_json::to_value(
                variation.map(|v| v.snapshot()).unwrap_or_default(),
            )
            .map_err(anyhow::Error::from)?),
            shipping_from: Set(variation
                .and_then(|v| v.variation.shipping_from.clone())
                .or_else(|| bundle.product.shipping_from.clone())),
            created_at: NotSet,
        });

        if product_stock.unlimited_stock || product_stock.pooled_weight_g.is_some() {
            continue;
        }
        match line.variation_id {
            Some(variation_id) => {
                ProductVariations::update_many()
                    .col_expr(
                        VariationCol::Stock,
                        Expr::col(VariationCol::Stock).sub(quantity),
                    )
                    .filter(VariationCol::Id.eq(variation_id))
                    .exec(&txn)
                    .await?;
            }
            None => {
                Products::update_many()
                    .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
                    .filter(ProdCol::Id.eq(bundle.product.id))
                    .exec(&txn)
                    .await?;
            }
        }
    }

    for (product_id, grams) in &pool_usage {
        let grams = i32::try_from(*grams)
            .map_err(|_| AppError::BadRequest("ordered weight is too large".into()))?;
        Products::update_many()
            .col_expr(ProdCol::WeightG, Expr::col(ProdCol::WeightG).sub(grams))
            .filter(ProdCol::Id.eq(*product_id))
            .exec(&txn)
            .await?;
    }

    let order = OrderActive {
        id: Set(order_id),
        order_number: Set(build_order_number(order_id)),
        customer_name: Set(payload.customer_name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        phone: Set(trimmed(payload.phone)),
        note: Set(trimmed(payload.note)),
        status: Set("pending".into()),
        payment_status: Set("unpaid".into()),
        subtotal: Set(subtotal),
        discount_total: Set(subtotal - total),
        total_amount: Set(total),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let shipping = insert_address(&txn, order.id, ADDRESS_SHIPPING, &payload.shipping_address).await?;
    let mut addresses = vec![shipping];
    if let Some(billing) = payload.billing_address.as_ref() {
        addresses.push(insert_address(&txn, order.id, ADDRESS_BILLING, billing).await?);
    }

    let mut items: Vec<OrderItem> = Vec::with_capacity(pending_items.len());
    for item in pending_items {
        items.push(item.insert(&txn).await?.into());
    }

    txn.commit().await?;
    tracing::info!(order = %order.order_number, total = order.total_amount, "order created");

    audit::record(
        &state.pool,
        None,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id, "order_number": order.order_number }),
    )
    .await;

    let order: Order = order.into();
    // The order is committed; delivery must not hold up the response.
    let email = order_email(state, &order, &items, &addresses);
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        mailer.send_order_notifications(&email).await;
    });

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order,
            items,
            addresses,
        },
        Some(Meta::empty()),
    ))
}

/// Customer-facing lookup; the email must match the order's.
pub async fn get_order_by_number(
    state: &AppState,
    order_number: &str,
    email: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(OrderCol::OrderNumber.eq(order_number))
        .one(&state.orm)
        .await?
        .filter(|o| o.email.eq_ignore_ascii_case(email.trim()))
        .ok_or(AppError::NotFound)?;

    let data = load_order_with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

pub(crate) async fn load_order_with_items<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
) -> AppResult<OrderWithItems> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    let addresses = Addresses::find()
        .filter(AddressCol::OrderId.eq(order.id))
        .order_by_desc(AddressCol::Kind)
        .all(conn)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    Ok(OrderWithItems {
        order: order.into(),
        items,
        addresses,
    })
}

async fn insert_address<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    kind: &str,
    input: &AddressInput,
) -> AppResult<Address> {
    let model = AddressActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        kind: Set(kind.to_string()),
        name: Set(input.name.trim().to_string()),
        street: Set(input.street.trim().to_string()),
        city: Set(input.city.trim().to_string()),
        postal_code: Set(input.postal_code.trim().to_string()),
        country: Set(input.country.trim().to_string()),
        created_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(model.into())
}

fn validate_checkout(cart: &Cart, payload: &CheckoutRequest) -> AppResult<()> {
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    if cart.items.iter().any(|i| i.quantity == 0) {
        return Err(AppError::BadRequest("Cart has invalid quantity".into()));
    }
    require_text("customer_name", &payload.customer_name)?;
    let email = payload.email.trim();
    if !is_plausible_email(email) {
        return Err(AppError::BadRequest("email is not valid".into()));
    }
    validate_address(&payload.shipping_address)?;
    if let Some(billing) = payload.billing_address.as_ref() {
        validate_address(billing)?;
    }
    Ok(())
}

fn validate_address(address: &AddressInput) -> AppResult<()> {
    require_text("address name", &address.name)?;
    require_text("street", &address.street)?;
    require_text("city", &address.city)?;
    require_text("postal_code", &address.postal_code)?;
    require_text("country", &address.country)
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn order_email(
    state: &AppState,
    order: &Order,
    items: &[OrderItem],
    addresses: &[Address],
) -> OrderEmail {
    OrderEmail {
        site_name: state.config.site_name.clone(),
        currency: state.config.currency.clone(),
        order_number: order.order_number.clone(),
        customer_name: order.customer_name.clone(),
        customer_email: order.email.clone(),
        phone: order.phone.clone(),
        note: order.note.clone(),
        shipping_address: addresses
            .iter()
            .find(|a| a.kind == ADDRESS_SHIPPING)
            .map(Address::lines)
            .unwrap_or_default(),
        lines: items
            .iter()
            .map(|i| OrderEmailLine {
                name: i.product_name.clone(),
                attributes: i.attributes.clone(),
                quantity: i.quantity,
                unit_price: i.unit_price,
                discount: i.discount,
                line_total: i.line_total,
            })
            .collect(),
        subtotal: order.subtotal,
        discount_total: order.discount_total,
        total: order.total_amount,
    }
}

/// Hex characters of the order id kept in the order number.
const ORDER_NUMBER_HEX: usize = 16;

fn build_order_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("ORD-{}-{}", date, &suffix[..ORDER_NUMBER_HEX])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    fn address() -> AddressInput {
        AddressInput {
            name: "Jana Nováková".into(),
            street: "Dlouhá 1".into(),
            city: "Praha".into(),
            postal_code: "110 00".into(),
            country: "CZ".into(),
        }
    }

    fn request(email: &str) -> CheckoutRequest {
        CheckoutRequest {
            customer_name: "Jana".into(),
            email: email.into(),
            phone: None,
            note: None,
            shipping_address: address(),
            billing_address: None,
        }
    }

    fn cart() -> Cart {
        Cart {
            items: vec![CartItem {
                product_id: Uuid::new_v4(),
                variation_id: None,
                name: "Sencha".into(),
                slug: "sencha".into(),
                sku: None,
                quantity: 1,
                unit_price: 100,
                discount: None,
                max_stock: None,
                attributes: vec![],
            }],
        }
    }

    #[test]
    fn order_numbers_are_dated_and_wide() {
        let id = Uuid::new_v4();
        let number = build_order_number(id);
        assert!(number.starts_with("ORD-"));
        assert_eq!(number.len(), "ORD-20261017-".len() + ORDER_NUMBER_HEX);
        assert!(number.ends_with(&id.simple().to_string()[..ORDER_NUMBER_HEX]));

        let numbers: std::collections::HashSet<String> =
            (0..10_000).map(|_| build_order_number(Uuid::new_v4())).collect();
        assert_eq!(numbers.len(), 10_000);
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let err = validate_checkout(&Cart::default(), &request("a@b.cz")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("empty")));
    }

    #[test]
    fn email_and_address_are_validated() {
        assert!(validate_checkout(&cart(), &request("jana@example.cz")).is_ok());
        assert!(validate_checkout(&cart(), &request("jana.example.cz")).is_err());
        assert!(validate_checkout(&cart(), &request("jana@localhost")).is_err());

        let mut missing_city = request("jana@example.cz");
        missing_city.shipping_address.city = "  ".into();
        assert!(validate_checkout(&cart(), &missing_city).is_err());
    }

    #[test]
    fn blank_optional_fields_are_dropped() {
        assert_eq!(trimmed(Some("  ".into())), None);
        assert_eq!(trimmed(Some(" call me ".into())), Some("call me".into()));
    }
}
