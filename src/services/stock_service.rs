use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    cart::AttributeSnapshot,
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        product_variations::{
            Column as VariationCol, Entity as ProductVariations, Model as VariationModel,
        },
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        variation_attributes::{
            Column as AttrCol, Entity as VariationAttributes, Model as AttributeModel,
        },
    },
    error::AppResult,
    pricing,
    stock::{ProductStock, VariationStock, WEIGHT_ATTRIBUTE},
};

#[derive(Debug, Clone)]
pub struct VariationBundle {
    pub variation: VariationModel,
    pub attributes: Vec<AttributeModel>,
}

impl VariationBundle {
    pub fn weight_g(&self) -> Option<i32> {
        self.attributes
            .iter()
            .find(|a| a.key.eq_ignore_ascii_case(WEIGHT_ATTRIBUTE))
            .and_then(|a| a.value.trim().parse::<i32>().ok())
    }

    pub fn snapshot(&self) -> Vec<AttributeSnapshot> {
        self.attributes
            .iter()
            .map(|a| AttributeSnapshot {
                key: a.key.clone(),
                value: a.value.clone(),
            })
            .collect()
    }
}

/// A product row with its variations, as needed to price and validate cart lines.
#[derive(Debug, Clone)]
pub struct ProductBundle {
    pub product: ProductModel,
    pub unlimited_category: bool,
    pub variations: Vec<VariationBundle>,
}

impl ProductBundle {
    pub fn variation(&self, id: Uuid) -> Option<&VariationBundle> {
        self.variations.iter().find(|v| v.variation.id == id)
    }

    pub fn stock(&self) -> ProductStock {
        let variations: Vec<VariationStock> = if self.product.has_variations {
            self.variations
                .iter()
                .map(|v| VariationStock {
                    id: v.variation.id,
                    stock: v.variation.stock,
                    weight_g: v.weight_g(),
                })
                .collect()
        } else {
            Vec::new()
        };
        let pooled = ProductStock::is_weight_pooled(
            self.product.has_variations,
            self.product.weight_g,
            &variations,
        );
        ProductStock {
            product_id: self.product.id,
            stock: self.product.stock,
            unlimited_stock: self.product.unlimited_stock || self.unlimited_category,
            pooled_weight_g: if pooled { self.product.weight_g } else { None },
            variations,
        }
    }

    /// Current unit price and discount of a line, straight from the database rows.
    pub fn price_of(&self, variation_id: Option<Uuid>) -> Option<(i64, Option<i32>)> {
        match variation_id {
            None => Some((
                self.product.price,
                pricing::effective_discount(self.product.discount, None),
            )),
            Some(id) => self.variation(id).map(|v| {
                (
                    v.variation.price,
                    pricing::effective_discount(self.product.discount, v.variation.discount),
                )
            }),
        }
    }
}

/// Load active products with their variations and attributes.
///
/// With `lock` the product and variation rows are selected `FOR UPDATE`;
/// only meaningful inside a transaction.
pub async fn load_bundles<C: ConnectionTrait>(
    conn: &C,
    product_ids: &[Uuid],
    lock: bool,
) -> AppResult<HashMap<Uuid, ProductBundle>> {
    fetch_bundles(conn, product_ids, lock, true).await
}

/// Like [`load_bundle`] but also finds inactive products; used by the dashboard.
pub async fn load_any_bundle<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    lock: bool,
) -> AppResult<Option<ProductBundle>> {
    let mut bundles = fetch_bundles(conn, &[product_id], lock, false).await?;
    Ok(bundles.remove(&product_id))
}

async fn fetch_bundles<C: ConnectionTrait>(
    conn: &C,
    product_ids: &[Uuid],
    lock: bool,
    active_only: bool,
) -> AppResult<HashMap<Uuid, ProductBundle>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut product_query = Products::find()
        .filter(ProdCol::Id.is_in(product_ids.iter().copied()))
        .order_by_asc(ProdCol::Id);
    if active_only {
        product_query = product_query.filter(ProdCol::Active.eq(true));
    }
    if lock {
        product_query = product_query.lock(LockType::Update);
    }
    let products = product_query.all(conn).await?;

    let category_ids: Vec<Uuid> = products.iter().filter_map(|p| p.category_id).collect();
    let unlimited_categories: Vec<Uuid> = if category_ids.is_empty() {
        Vec::new()
    } else {
        Categories::find()
            .select_only()
            .column(CategoryCol::Id)
            .filter(CategoryCol::Id.is_in(category_ids))
            .filter(CategoryCol::UnlimitedStock.eq(true))
            .into_tuple::<Uuid>()
            .all(conn)
            .await?
    };

    let found_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
    let mut variation_query = ProductVariations::find()
        .filter(VariationCol::ProductId.is_in(found_ids))
        .order_by_asc(VariationCol::SortOrder)
        .order_by_asc(VariationCol::Sku);
    if lock {
        variation_query = variation_query.lock(LockType::Update);
    }
    let variations = variation_query.all(conn).await?;

    let mut attributes = load_attributes(conn, variations.iter().map(|v| v.id).collect()).await?;

    let mut grouped: HashMap<Uuid, Vec<VariationBundle>> = HashMap::new();
    for variation in variations {
        let attrs = attributes.remove(&variation.id).unwrap_or_default();
        grouped
            .entry(variation.product_id)
            .or_default()
            .push(VariationBundle {
                variation,
                attributes: attrs,
            });
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let unlimited_category = product
                .category_id
                .is_some_and(|id| unlimited_categories.contains(&id));
            let variations = grouped.remove(&product.id).unwrap_or_default();
            (
                product.id,
                ProductBundle {
                    product,
                    unlimited_category,
                    variations,
                },
            )
        })
        .collect())
}

pub async fn load_bundle<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
) -> AppResult<Option<ProductBundle>> {
    let mut bundles = load_bundles(conn, &[product_id], false).await?;
    Ok(bundles.remove(&product_id))
}

pub async fn load_attributes<C: ConnectionTrait>(
    conn: &C,
    variation_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<AttributeModel>>> {
    if variation_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = VariationAttributes::find()
        .filter(AttrCol::VariationId.is_in(variation_ids))
        .order_by_asc(AttrCol::Key)
        .all(conn)
        .await?;
    let mut grouped: HashMap<Uuid, Vec<AttributeModel>> = HashMap::new();
    for row in rows {
        grouped.entry(row.variation_id).or_default().push(row);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(has_variations: bool, weight_g: Option<i32>) -> ProductModel {
        let now = Utc::now().into();
        ProductModel {
            id: Uuid::new_v4(),
            name: "Sencha".into(),
            slug: "sencha".into(),
            description: None,
            price: 20_000,
            stock: 4,
            unlimited_stock: false,
            has_variations,
            weight_g,
            discount: Some(10),
            shipping_from: None,
            image_url: None,
            active: true,
            category_id: None,
            brand_id: None,
            tea_category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn variation(product_id: Uuid, price: i64, weight: Option<&str>) -> VariationBundle {
        let id = Uuid::new_v4();
        VariationBundle {
            variation: VariationModel {
                id,
                product_id,
                sku: format!("SKU-{id}"),
                price,
                stock: 3,
                sort_order: 0,
                discount: None,
                shipping_from: None,
                created_at: Utc::now().into(),
            },
            attributes: weight
                .map(|w| {
                    vec![AttributeModel {
                        id: Uuid::new_v4(),
                        variation_id: id,
                        key: "weight_g".into(),
                        value: w.into(),
                    }]
                })
                .unwrap_or_default(),
        }
    }

    #[test]
    fn weighted_variations_form_a_pool() {
        let product = product(true, Some(1_000));
        let id = product.id;
        let bundle = ProductBundle {
            product,
            unlimited_category: false,
            variations: vec![variation(id, 10_000, Some("50")), variation(id, 18_000, Some(" 100 "))],
        };
        let stock = bundle.stock();
        assert_eq!(stock.pooled_weight_g, Some(1_000));
        assert_eq!(stock.variations[1].weight_g, Some(100));
    }

    #[test]
    fn missing_weight_keeps_per_variation_stock() {
        let product = product(true, Some(1_000));
        let id = product.id;
        let bundle = ProductBundle {
            product,
            unlimited_category: false,
            variations: vec![variation(id, 10_000, Some("50")), variation(id, 18_000, None)],
        };
        assert_eq!(bundle.stock().pooled_weight_g, None);
    }

    #[test]
    fn unlimited_category_marks_the_product_unlimited() {
        let bundle = ProductBundle {
            product: product(false, None),
            unlimited_category: true,
            variations: vec![],
        };
        assert!(bundle.stock().unlimited_stock);
    }

    #[test]
    fn prices_come_from_the_variation_with_inherited_discount() {
        let product = product(true, None);
        let id = product.id;
        let v = variation(id, 18_000, None);
        let vid = v.variation.id;
        let bundle = ProductBundle {
            product,
            unlimited_category: false,
            variations: vec![v],
        };
        assert_eq!(bundle.price_of(Some(vid)), Some((18_000, Some(10))));
        assert_eq!(bundle.price_of(None), Some((20_000, Some(10))));
        assert_eq!(bundle.price_of(Some(Uuid::new_v4())), None);
    }
}
