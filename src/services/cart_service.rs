use uuid::Uuid;

use crate::{
    cart::{Cart, CartItem},
    dto::cart::{AddCartItemRequest, CartView, RemoveCartItemRequest, UpdateCartItemRequest},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::stock_service::{self, ProductBundle},
    state::AppState,
};

pub struct CartOutcome {
    pub cart: Cart,
    pub response: ApiResponse<CartView>,
}

impl CartOutcome {
    fn new(message: &str, cart: Cart, view: CartView) -> Self {
        Self {
            cart,
            response: ApiResponse::success(message, view, Some(Meta::empty())),
        }
    }
}

/// Refresh snapshots and re-validate every line against current stock.
pub async fn view_cart(state: &AppState, mut cart: Cart) -> AppResult<CartOutcome> {
    let ids: Vec<Uuid> = unique_product_ids(&cart);
    let bundles = stock_service::load_bundles(&state.orm, &ids, false).await?;

    for item in &mut cart.items {
        if let Some(bundle) = bundles.get(&item.product_id) {
            refresh_snapshot(item, bundle);
        }
    }

    let stock = bundles
        .iter()
        .map(|(id, bundle)| (*id, bundle.stock()))
        .collect();
    let adjustments = cart.reconcile(&stock);
    if !adjustments.is_empty() {
        tracing::debug!(count = adjustments.len(), "cart adjusted to current stock");
    }

    let view = CartView::new(&cart, adjustments);
    Ok(CartOutcome::new("Cart", cart, view))
}

pub async fn add_item(
    state: &AppState,
    mut cart: Cart,
    payload: AddCartItemRequest,
) -> AppResult<CartOutcome> {
    if payload.quantity == 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    let bundle = load_active(state, payload.product_id).await?;
    let item = snapshot_item(&bundle, payload.variation_id, payload.quantity)?;

    cart.add_item(&bundle.stock(), item)?;
    tracing::debug!(product_id = %payload.product_id, quantity = payload.quantity, "cart item added");

    let view = CartView::new(&cart, Vec::new());
    Ok(CartOutcome::new("Added to cart", cart, view))
}

pub async fn update_item(
    state: &AppState,
    mut cart: Cart,
    payload: UpdateCartItemRequest,
) -> AppResult<CartOutcome> {
    if payload.quantity == 0 {
        cart.remove_item(payload.product_id, payload.variation_id)?;
    } else {
        let bundle = load_active(state, payload.product_id).await?;
        cart.update_quantity(&bundle.stock(), payload.variation_id, payload.quantity)?;
    }

    let view = CartView::new(&cart, Vec::new());
    Ok(CartOutcome::new("Cart updated", cart, view))
}

pub fn remove_item(mut cart: Cart, payload: RemoveCartItemRequest) -> AppResult<CartOutcome> {
    cart.remove_item(payload.product_id, payload.variation_id)?;
    let view = CartView::new(&cart, Vec::new());
    Ok(CartOutcome::new("Removed from cart", cart, view))
}

pub fn clear(mut cart: Cart) -> CartOutcome {
    cart.clear();
    let view = CartView::new(&cart, Vec::new());
    CartOutcome::new("Cart cleared", cart, view)
}

async fn load_active(state: &AppState, product_id: Uuid) -> AppResult<ProductBundle> {
    stock_service::load_bundle(&state.orm, product_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))
}

fn unique_product_ids(cart: &Cart) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
    ids.sort();
    ids.dedup();
    ids
}

pub(crate) fn snapshot_item(
    bundle: &ProductBundle,
    variation_id: Option<Uuid>,
    quantity: u32,
) -> AppResult<CartItem> {
    let (unit_price, discount) = bundle
        .price_of(variation_id)
        .ok_or_else(|| AppError::BadRequest("variation not found".to_string()))?;
    let variation = variation_id.and_then(|id| bundle.variation(id));

    Ok(CartItem {
        product_id: bundle.product.id,
        variation_id,
        name: bundle.product.name.clone(),
        slug: bundle.product.slug.clone(),
        sku: variation.map(|v| v.variation.sku.clone()),
        quantity,
        unit_price,
        discount,
        max_stock: None,
        attributes: variation.map(|v| v.snapshot()).unwrap_or_default(),
    })
}

fn refresh_snapshot(item: &mut CartItem, bundle: &ProductBundle) {
    if let Some((unit_price, discount)) = bundle.price_of(item.variation_id) {
        item.unit_price = unit_price;
        item.discount = discount;
    }
    item.name = bundle.product.name.clone();
    item.slug = bundle.product.slug.clone();
    if let Some(v) = item.variation_id.and_then(|id| bundle.variation(id)) {
        item.sku = Some(v.variation.sku.clone());
        item.attributes = v.snapshot();
    }
}
