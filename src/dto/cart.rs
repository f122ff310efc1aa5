use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::{Cart, CartAdjustment, CartItem, CartTotals};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    pub quantity: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    /// Zero removes the line.
    pub quantity: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveCartItemRequest {
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub totals: CartTotals,
    /// Changes made while re-validating the cart against current stock.
    pub adjustments: Vec<CartAdjustment>,
}

impl CartView {
    pub fn new(cart: &Cart, adjustments: Vec<CartAdjustment>) -> Self {
        Self {
            items: cart
                .items
                .iter()
                .map(|item| CartLineView {
                    line_total: item.line_total(),
                    item: item.clone(),
                })
                .collect(),
            totals: cart.totals(),
            adjustments,
        }
    }
}
