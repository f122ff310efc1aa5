//! Client-held shopping cart.
//!
//! The cart lives in a cookie; the server only validates and rewrites it.
//! Every mutation re-checks availability through [`crate::stock`].

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    pricing,
    stock::{self, Availability, ProductStock, Reservation, StockError},
};

pub const CART_COOKIE: &str = "cart";
/// Browsers drop cookies past roughly 4 KiB.
pub const MAX_COOKIE_VALUE_LEN: usize = 4000;
pub const CART_COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttributeSnapshot {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub product_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub quantity: u32,
    pub unit_price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i32>,
    /// Availability when the line was last validated; `None` means unlimited.
    #[serde(default)]
    pub max_stock: Option<u32>,
    #[serde(default)]
    pub attributes: Vec<AttributeSnapshot>,
}

impl CartItem {
    pub fn key(&self) -> (Uuid, Option<Uuid>) {
        (self.product_id, self.variation_id)
    }

    pub fn line_total(&self) -> i64 {
        pricing::line_total(self.unit_price, self.discount, self.quantity)
    }
}

impl Reservation for CartItem {
    fn product_id(&self) -> Uuid {
        self.product_id
    }

    fn variation_id(&self) -> Option<Uuid> {
        self.variation_id
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartAdjustment {
    /// The product or variation no longer exists.
    Removed {
        product_id: Uuid,
        variation_id: Option<Uuid>,
        name: String,
    },
    SoldOut {
        product_id: Uuid,
        variation_id: Option<Uuid>,
        name: String,
    },
    Reduced {
        product_id: Uuid,
        variation_id: Option<Uuid>,
        name: String,
        from: u32,
        to: u32,
    },
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be greater than 0")]
    InvalidQuantity,

    #[error("cart item not found")]
    ItemNotFound,

    #[error("only {available} left in stock for {name}")]
    InsufficientStock { name: String, available: u32 },

    #[error(transparent)]
    Stock(#[from] StockError),
}

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cart cookie is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    #[error("cart cookie is not a valid cart")]
    Json(#[from] serde_json::Error),

    #[error("cart is too large to store")]
    TooLarge,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, product_id: Uuid, variation_id: Option<Uuid>) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.key() == (product_id, variation_id))
    }

    /// Add a line, merging it into an existing line for the same product and variation.
    pub fn add_item(&mut self, product: &ProductStock, item: CartItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let existing = self.position(item.product_id, item.variation_id);
        let availability =
            stock::available_quantity(product, item.variation_id, &self.items, existing)?;
        let wanted = existing
            .map(|idx| self.items[idx].quantity)
            .unwrap_or(0)
            .saturating_add(item.quantity);
        if !availability.allows(wanted) {
            return Err(insufficient(&item.name, availability));
        }

        match existing {
            Some(idx) => {
                let line = &mut self.items[idx];
                line.quantity = wanted;
                line.unit_price = item.unit_price;
                line.discount = item.discount;
                line.max_stock = availability.cap();
            }
            None => self.items.push(CartItem {
                max_stock: availability.cap(),
                ..item
            }),
        }
        Ok(())
    }

    /// Set a line's quantity; zero removes the line.
    pub fn update_quantity(
        &mut self,
        product: &ProductStock,
        variation_id: Option<Uuid>,
        quantity: u32,
    ) -> Result<(), CartError> {
        let idx = self
            .position(product.product_id, variation_id)
            .ok_or(CartError::ItemNotFound)?;
        if quantity == 0 {
            self.items.remove(idx);
            return Ok(());
        }
        let availability =
            stock::available_quantity(product, variation_id, &self.items, Some(idx))?;
        if !availability.allows(quantity) {
            return Err(insufficient(&self.items[idx].name, availability));
        }
        let line = &mut self.items[idx];
        line.quantity = quantity;
        line.max_stock = availability.cap();
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        product_id: Uuid,
        variation_id: Option<Uuid>,
    ) -> Result<CartItem, CartError> {
        let idx = self
            .position(product_id, variation_id)
            .ok_or(CartError::ItemNotFound)?;
        Ok(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn totals(&self) -> CartTotals {
        let item_count = self.items.iter().map(|i| i.quantity).sum();
        let subtotal: i64 = self
            .items
            .iter()
            .map(|i| i.unit_price * i64::from(i.quantity))
            .sum();
        let total: i64 = self.items.iter().map(CartItem::line_total).sum();
        CartTotals {
            item_count,
            subtotal,
            discount: subtotal - total,
            total,
        }
    }

    /// Re-validate every line against fresh stock.
    ///
    /// Lines are accepted in cart order, so earlier lines keep priority on a
    /// shared stock pool. Lines that cannot be validated are dropped.
    pub fn reconcile(&mut self, products: &HashMap<Uuid, ProductStock>) -> Vec<CartAdjustment> {
        let mut adjustments = Vec::new();
        let mut accepted: Vec<CartItem> = Vec::with_capacity(self.items.len());

        for mut line in self.items.drain(..) {
            let removed = CartAdjustment::Removed {
                product_id: line.product_id,
                variation_id: line.variation_id,
                name: line.name.clone(),
            };
            let Some(product) = products.get(&line.product_id) else {
                adjustments.push(removed);
                continue;
            };
            let availability =
                match stock::available_quantity(product, line.variation_id, &accepted, None) {
                    Ok(a) => a,
                    Err(_) => {
                        adjustments.push(removed);
                        continue;
                    }
                };

            match availability.cap() {
                Some(0) => adjustments.push(CartAdjustment::SoldOut {
                    product_id: line.product_id,
                    variation_id: line.variation_id,
                    name: line.name.clone(),
                }),
                Some(max) if line.quantity > max => {
                    adjustments.push(CartAdjustment::Reduced {
                        product_id: line.product_id,
                        variation_id: line.variation_id,
                        name: line.name.clone(),
                        from: line.quantity,
                        to: max,
                    });
                    line.quantity = max;
                    line.max_stock = Some(max);
                    accepted.push(line);
                }
                cap => {
                    line.max_stock = cap;
                    accepted.push(line);
                }
            }
        }

        self.items = accepted;
        adjustments
    }

    pub fn to_cookie_value(&self) -> Result<String, CookieError> {
        let json = serde_json::to_vec(self)?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        if encoded.len() > MAX_COOKIE_VALUE_LEN {
            return Err(CookieError::TooLarge);
        }
        Ok(encoded)
    }

    pub fn from_cookie_value(value: &str) -> Result<Self, CookieError> {
        let bytes = URL_SAFE_NO_PAD.decode(value.trim())?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn insufficient(name: &str, availability: Availability) -> CartError {
    CartError::InsufficientStock {
        name: name.to_string(),
        available: availability.cap().unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock::VariationStock;

    fn plain(stock: i32) -> ProductStock {
        ProductStock {
            product_id: Uuid::new_v4(),
            stock,
            unlimited_stock: false,
            pooled_weight_g: None,
            variations: vec![],
        }
    }

    fn item(product: &ProductStock, variation_id: Option<Uuid>, quantity: u32) -> CartItem {
        CartItem {
            product_id: product.product_id,
            variation_id,
            name: "Sencha".into(),
            slug: "sencha".into(),
            sku: None,
            quantity,
            unit_price: 1000,
            discount: None,
            max_stock: None,
            attributes: vec![],
        }
    }

    #[test]
    fn adding_the_same_line_twice_merges_quantities() {
        let product = plain(10);
        let mut cart = Cart::default();
        cart.add_item(&product, item(&product, None, 3)).unwrap();
        cart.add_item(&product, item(&product, None, 4)).unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 7);
        assert_eq!(cart.items[0].max_stock, Some(10));
    }

    #[test]
    fn merged_quantity_cannot_exceed_stock() {
        let product = plain(5);
        let mut cart = Cart::default();
        cart.add_item(&product, item(&product, None, 4)).unwrap();
        let err = cart.add_item(&product, item(&product, None, 2)).unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { available: 5, .. }));
        assert_eq!(cart.items[0].quantity, 4);
    }

    #[test]
    fn zero_quantity_is_rejected_on_add() {
        let product = plain(5);
        let mut cart = Cart::default();
        assert!(matches!(
            cart.add_item(&product, item(&product, None, 0)),
            Err(CartError::InvalidQuantity)
        ));
    }

    #[test]
    fn update_to_zero_removes_the_line() {
        let product = plain(5);
        let mut cart = Cart::default();
        cart.add_item(&product, item(&product, None, 2)).unwrap();
        cart.update_quantity(&product, None, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn update_checks_stock_without_counting_the_line_itself() {
        let product = plain(5);
        let mut cart = Cart::default();
        cart.add_item(&product, item(&product, None, 4)).unwrap();
        cart.update_quantity(&product, None, 5).unwrap();
        assert_eq!(cart.items[0].quantity, 5);
        assert!(cart.update_quantity(&product, None, 6).is_err());
    }

    #[test]
    fn update_of_missing_line_fails() {
        let product = plain(5);
        let mut cart = Cart::default();
        assert!(matches!(
            cart.update_quantity(&product, None, 1),
            Err(CartError::ItemNotFound)
        ));
    }

    #[test]
    fn totals_split_subtotal_and_discount() {
        let product = plain(10);
        let mut cart = Cart::default();
        let mut discounted = item(&product, None, 2);
        discounted.discount = Some(10);
        cart.add_item(&product, discounted).unwrap();
        let totals = cart.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.subtotal, 2000);
        assert_eq!(totals.discount, 200);
        assert_eq!(totals.total, 1800);
    }

    #[test]
    fn weight_pool_limits_mixed_pack_sizes() {
        let small = VariationStock { id: Uuid::new_v4(), stock: 0, weight_g: Some(50) };
        let large = VariationStock { id: Uuid::new_v4(), stock: 0, weight_g: Some(100) };
        let product = ProductStock {
            product_id: Uuid::new_v4(),
            stock: 0,
            unlimited_stock: false,
            pooled_weight_g: Some(300),
            variations: vec![small.clone(), large.clone()],
        };
        let mut cart = Cart::default();
        cart.add_item(&product, item(&product, Some(large.id), 2)).unwrap();
        // 100 g left: two small packs fit, three do not.
        assert!(cart.add_item(&product, item(&product, Some(small.id), 3)).is_err());
        cart.add_item(&product, item(&product, Some(small.id), 2)).unwrap();
        assert_eq!(cart.items[1].max_stock, Some(2));
    }

    #[test]
    fn reconcile_clamps_drops_and_reports() {
        let kept = plain(2);
        let sold_out = plain(0);
        let vanished = plain(9);
        let mut cart = Cart {
            items: vec![
                item(&kept, None, 5),
                item(&sold_out, None, 1),
                item(&vanished, None, 1),
            ],
        };
        let products = HashMap::from([
            (kept.product_id, kept.clone()),
            (sold_out.product_id, sold_out.clone()),
        ]);

        let adjustments = cart.reconcile(&products);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[0].max_stock, Some(2));
        assert_eq!(adjustments.len(), 3);
        assert!(matches!(adjustments[0], CartAdjustment::Reduced { from: 5, to: 2, .. }));
        assert!(matches!(adjustments[1], CartAdjustment::SoldOut { .. }));
        assert!(matches!(adjustments[2], CartAdjustment::Removed { .. }));
    }

    #[test]
    fn reconcile_gives_earlier_lines_priority_on_a_pool() {
        let v = VariationStock { id: Uuid::new_v4(), stock: 0, weight_g: Some(100) };
        let w = VariationStock { id: Uuid::new_v4(), stock: 0, weight_g: Some(200) };
        let product = ProductStock {
            product_id: Uuid::new_v4(),
            stock: 0,
            unlimited_stock: false,
            pooled_weight_g: Some(500),
            variations: vec![v.clone(), w.clone()],
        };
        let mut cart = Cart {
            items: vec![item(&product, Some(v.id), 3), item(&product, Some(w.id), 2)],
        };
        let products = HashMap::from([(product.product_id, product.clone())]);
        let adjustments = cart.reconcile(&products);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[1].quantity, 1);
        assert_eq!(adjustments.len(), 1);
    }

    #[test]
    fn reconcile_keeps_unlimited_lines_untouched() {
        let mut product = plain(0);
        product.unlimited_stock = true;
        let mut cart = Cart { items: vec![item(&product, None, 40)] };
        let products = HashMap::from([(product.product_id, product.clone())]);
        assert!(cart.reconcile(&products).is_empty());
        assert_eq!(cart.items[0].quantity, 40);
        assert_eq!(cart.items[0].max_stock, None);
    }

    #[test]
    fn cookie_value_survives_the_trip_and_rejects_garbage() {
        let product = plain(3);
        let cart = Cart { items: vec![item(&product, None, 1)] };
        let value = cart.to_cookie_value().unwrap();
        assert!(!value.contains(';'));
        assert_eq!(Cart::from_cookie_value(&value).unwrap(), cart);
        assert!(Cart::from_cookie_value("%%%").is_err());
        assert!(Cart::from_cookie_value(&URL_SAFE_NO_PAD.encode(b"[1,2]")).is_err());
    }

    #[test]
    fn oversized_carts_do_not_fit_a_cookie() {
        let product = plain(1_000);
        let mut line = item(&product, None, 1);
        line.name = "x".repeat(MAX_COOKIE_VALUE_LEN);
        let cart = Cart { items: vec![line] };
        assert!(matches!(cart.to_cookie_value(), Err(CookieError::TooLarge)));
    }
}
