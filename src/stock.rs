//! Availability arithmetic shared by the cart and checkout.
//!
//! Nominal stock comes from the database; reservations are the quantities
//! already sitting in other cart lines. Nothing here persists a reservation.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Attribute key carrying a variation's unit weight in grams.
pub const WEIGHT_ATTRIBUTE: &str = "WEIGHT_G";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationStock {
    pub id: Uuid,
    pub stock: i32,
    pub weight_g: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductStock {
    pub product_id: Uuid,
    pub stock: i32,
    pub unlimited_stock: bool,
    /// Total grams shared by every variation; `Some` only for weight-pooled products.
    pub pooled_weight_g: Option<i32>,
    pub variations: Vec<VariationStock>,
}

impl ProductStock {
    pub fn has_variations(&self) -> bool {
        !self.variations.is_empty()
    }

    pub fn variation(&self, id: Uuid) -> Option<&VariationStock> {
        self.variations.iter().find(|v| v.id == id)
    }

    /// A product shares one weight budget when it declares a total weight and
    /// every variation carries a positive unit weight.
    pub fn is_weight_pooled(
        has_variations: bool,
        weight_g: Option<i32>,
        variations: &[VariationStock],
    ) -> bool {
        has_variations
            && weight_g.is_some()
            && !variations.is_empty()
            && variations
                .iter()
                .all(|v| v.weight_g.is_some_and(|w| w > 0))
    }
}

/// A quantity held by a cart line.
pub trait Reservation {
    fn product_id(&self) -> Uuid;
    fn variation_id(&self) -> Option<Uuid>;
    fn quantity(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", content = "quantity", rename_all = "snake_case")]
pub enum Availability {
    Unlimited,
    Limited(u32),
}

impl Availability {
    pub fn allows(&self, quantity: u32) -> bool {
        match self {
            Availability::Unlimited => true,
            Availability::Limited(max) => quantity <= *max,
        }
    }

    pub fn cap(&self) -> Option<u32> {
        match self {
            Availability::Unlimited => None,
            Availability::Limited(max) => Some(*max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("product {0} requires a variation")]
    VariationRequired(Uuid),

    #[error("product {0} has no variations")]
    UnexpectedVariation(Uuid),

    #[error("variation {variation} does not belong to product {product}")]
    UnknownVariation { product: Uuid, variation: Uuid },
}

/// How many units of `(product, variation_id)` can still go into the cart.
///
/// `exclude` is the index of the line being edited; it is left out of the
/// reservation sums so a line is never counted against itself.
pub fn available_quantity<R: Reservation>(
    product: &ProductStock,
    variation_id: Option<Uuid>,
    lines: &[R],
    exclude: Option<usize>,
) -> Result<Availability, StockError> {
    let variation = resolve_variation(product, variation_id)?;

    if product.unlimited_stock {
        return Ok(Availability::Unlimited);
    }

    let others = lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != exclude)
        .map(|(_, line)| line)
        .filter(|line| line.product_id() == product.product_id);

    if let (Some(pool), Some(variation)) = (product.pooled_weight_g, variation) {
        let unit = i64::from(variation.weight_g.unwrap_or(0));
        if unit <= 0 {
            return Ok(Availability::Limited(0));
        }
        let committed: i64 = others
            .map(|line| {
                let weight = line
                    .variation_id()
                    .and_then(|id| product.variation(id))
                    .and_then(|v| v.weight_g)
                    .unwrap_or(0);
                i64::from(weight) * i64::from(line.quantity())
            })
            .sum();
        let remaining = (i64::from(pool) - committed).max(0);
        return Ok(Availability::Limited(clamp_u32(remaining / unit)));
    }

    let nominal = variation.map_or(product.stock, |v| v.stock);
    let reserved: i64 = others
        .filter(|line| line.variation_id() == variation_id)
        .map(|line| i64::from(line.quantity()))
        .sum();
    Ok(Availability::Limited(clamp_u32(
        (i64::from(nominal) - reserved).max(0),
    )))
}

fn resolve_variation(
    product: &ProductStock,
    variation_id: Option<Uuid>,
) -> Result<Option<&VariationStock>, StockError> {
    match (product.has_variations(), variation_id) {
        (true, None) => Err(StockError::VariationRequired(product.product_id)),
        (false, Some(_)) => Err(StockError::UnexpectedVariation(product.product_id)),
        (false, None) => Ok(None),
        (true, Some(id)) => product
            .variation(id)
            .map(Some)
            .ok_or(StockError::UnknownVariation {
                product: product.product_id,
                variation: id,
            }),
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(Uuid, Option<Uuid>, u32);

    impl Reservation for Line {
        fn product_id(&self) -> Uuid {
            self.0
        }
        fn variation_id(&self) -> Option<Uuid> {
            self.1
        }
        fn quantity(&self) -> u32 {
            self.2
        }
    }

    fn plain(stock: i32) -> ProductStock {
        ProductStock {
            product_id: Uuid::new_v4(),
            stock,
            unlimited_stock: false,
            pooled_weight_g: None,
            variations: vec![],
        }
    }

    fn with_variations(stocks: &[i32]) -> ProductStock {
        ProductStock {
            product_id: Uuid::new_v4(),
            stock: 0,
            unlimited_stock: false,
            pooled_weight_g: None,
            variations: stocks
                .iter()
                .map(|s| VariationStock {
                    id: Uuid::new_v4(),
                    stock: *s,
                    weight_g: None,
                })
                .collect(),
        }
    }

    fn pooled(pool: i32, weights: &[i32]) -> ProductStock {
        ProductStock {
            product_id: Uuid::new_v4(),
            stock: 0,
            unlimited_stock: false,
            pooled_weight_g: Some(pool),
            variations: weights
                .iter()
                .map(|w| VariationStock {
                    id: Uuid::new_v4(),
                    stock: 0,
                    weight_g: Some(*w),
                })
                .collect(),
        }
    }

    #[test]
    fn plain_product_subtracts_other_lines() {
        let product = plain(10);
        let lines = vec![Line(product.product_id, None, 3), Line(Uuid::new_v4(), None, 50)];
        let avail = available_quantity(&product, None, &lines, None).unwrap();
        assert_eq!(avail, Availability::Limited(7));
    }

    #[test]
    fn edited_line_is_not_counted_against_itself() {
        let product = plain(10);
        let lines = vec![Line(product.product_id, None, 4)];
        let avail = available_quantity(&product, None, &lines, Some(0)).unwrap();
        assert_eq!(avail, Availability::Limited(10));
    }

    #[test]
    fn variation_reservations_are_tracked_per_variation() {
        let product = with_variations(&[5, 8]);
        let (a, b) = (product.variations[0].id, product.variations[1].id);
        let lines = vec![Line(product.product_id, Some(a), 2), Line(product.product_id, Some(b), 6)];
        assert_eq!(
            available_quantity(&product, Some(a), &lines, None).unwrap(),
            Availability::Limited(3)
        );
        assert_eq!(
            available_quantity(&product, Some(b), &lines, None).unwrap(),
            Availability::Limited(2)
        );
    }

    #[test]
    fn never_reports_negative_availability() {
        let product = plain(2);
        let lines = vec![Line(product.product_id, None, 5)];
        assert_eq!(
            available_quantity(&product, None, &lines, None).unwrap(),
            Availability::Limited(0)
        );
    }

    #[test]
    fn unlimited_products_have_no_ceiling() {
        let mut product = plain(0);
        product.unlimited_stock = true;
        let lines = vec![Line(product.product_id, None, 1_000)];
        let avail = available_quantity(&product, None, &lines, None).unwrap();
        assert_eq!(avail, Availability::Unlimited);
        assert!(avail.allows(u32::MAX));
        assert_eq!(avail.cap(), None);
    }

    #[test]
    fn weight_pool_is_shared_across_variations() {
        // 1000 g pool, 50 g and 100 g packs.
        let product = pooled(1000, &[50, 100]);
        let (small, large) = (product.variations[0].id, product.variations[1].id);
        let lines = vec![Line(product.product_id, Some(small), 6)];
        // 1000 - 300 = 700 g left -> seven 100 g packs.
        assert_eq!(
            available_quantity(&product, Some(large), &lines, None).unwrap(),
            Availability::Limited(7)
        );
    }

    #[test]
    fn weight_pool_floors_partial_units() {
        let product = pooled(250, &[100]);
        let id = product.variations[0].id;
        let lines: Vec<Line> = vec![];
        assert_eq!(
            available_quantity(&product, Some(id), &lines, None).unwrap(),
            Availability::Limited(2)
        );
    }

    #[test]
    fn weight_pool_excludes_the_edited_line() {
        let product = pooled(500, &[100, 250]);
        let (small, large) = (product.variations[0].id, product.variations[1].id);
        let lines = vec![
            Line(product.product_id, Some(small), 3),
            Line(product.product_id, Some(large), 1),
        ];
        assert_eq!(
            available_quantity(&product, Some(small), &lines, Some(0)).unwrap(),
            Availability::Limited(2)
        );
    }

    #[test]
    fn variation_rules_are_enforced() {
        let product = with_variations(&[1]);
        let lines: Vec<Line> = vec![];
        assert_eq!(
            available_quantity(&product, None, &lines, None),
            Err(StockError::VariationRequired(product.product_id))
        );
        let stray = Uuid::new_v4();
        assert!(matches!(
            available_quantity(&product, Some(stray), &lines, None),
            Err(StockError::UnknownVariation { .. })
        ));
        let simple = plain(1);
        assert_eq!(
            available_quantity(&simple, Some(stray), &lines, None),
            Err(StockError::UnexpectedVariation(simple.product_id))
        );
    }

    #[test]
    fn pooling_requires_every_variation_to_carry_weight() {
        let weighted = [
            VariationStock { id: Uuid::new_v4(), stock: 0, weight_g: Some(50) },
            VariationStock { id: Uuid::new_v4(), stock: 0, weight_g: None },
        ];
        assert!(!ProductStock::is_weight_pooled(true, Some(1000), &weighted));
        assert!(ProductStock::is_weight_pooled(true, Some(1000), &weighted[..1]));
        assert!(!ProductStock::is_weight_pooled(true, None, &weighted[..1]));
        assert!(!ProductStock::is_weight_pooled(false, Some(1000), &[]));
    }
}
