use std::collections::HashSet;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{
        CreateProductRequest, ProductDetail, ProductList, StockAdjustRequest, UpdateProductRequest,
        VariationInput,
    },
    entity::{
        brands::Entity as Brands,
        categories::Entity as Categories,
        product_variations::{
            ActiveModel as VariationActive, Column as VariationCol, Entity as ProductVariations,
        },
        products::{ActiveModel, Column, Entity as Products},
        tea_categories::Entity as TeaCategories,
        variation_attributes::ActiveModel as AttributeActive,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    services::{
        catalog_service, check_discount, require_text, resolve_slug, stock_service,
    },
    state::AppState,
    stock::WEIGHT_ATTRIBUTE,
};

/// Dashboard listing; unlike the storefront it includes inactive products.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    catalog_service::list_products(state, query, true).await
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDetail>> {
    let bundle = stock_service::load_any_bundle(&state.orm, id, false)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = catalog_service::product_detail(state, bundle).await?;
    Ok(ApiResponse::success("Product", detail, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    require_text("name", &payload.name)?;
    check_amounts(Some(payload.price), Some(payload.stock), payload.weight_g)?;
    check_discount(payload.discount)?;
    validate_variations(&payload.variations)?;

    let txn = state.orm.begin().await?;
    check_references(
        &txn,
        payload.category_id,
        payload.brand_id,
        payload.tea_category_id,
    )
    .await?;
    check_skus_free(&txn, &payload.variations, None).await?;

    let slug = resolve_slug::<Products, _>(
        &txn,
        Column::Slug,
        Column::Id,
        payload.slug.as_deref(),
        &payload.name,
        None,
    )
    .await?;

    let id = Uuid::new_v4();
    let product = ActiveModel {
        id: Set(id),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        price: Set(payload.price),
        stock: Set(payload.stock),
        unlimited_stock: Set(payload.unlimited_stock),
        has_variations: Set(!payload.variations.is_empty()),
        weight_g: Set(payload.weight_g),
        discount: Set(payload.discount),
        shipping_from: Set(payload.shipping_from),
        image_url: Set(payload.image_url),
        active: Set(payload.active.unwrap_or(true)),
        category_id: Set(payload.category_id),
        brand_id: Set(payload.brand_id),
        tea_category_id: Set(payload.tea_category_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    insert_variations(&txn, product.id, &payload.variations).await?;
    txn.commit().await?;
    tracing::info!(product = %product.slug, "product created");

    audit::record(
        &state.pool,
        Some(&user.subject),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "slug": product.slug }),
    )
    .await;

    let detail = detail_of(state, product.id).await?;
    Ok(ApiResponse::success(
        "Product created",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    if let Some(name) = payload.name.as_deref() {
        require_text("name", name)?;
    }
    check_amounts(payload.price, payload.stock, payload.weight_g)?;
    check_discount(payload.discount)?;
    if let Some(variations) = payload.variations.as_ref() {
        validate_variations(variations)?;
    }

    let txn = state.orm.begin().await?;
    let existing = Products::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    check_references(
        &txn,
        payload.category_id,
        payload.brand_id,
        payload.tea_category_id,
    )
    .await?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(requested) = payload.slug.as_deref() {
        let slug = resolve_slug::<Products, _>(
            &txn,
            Column::Slug,
            Column::Id,
            Some(requested),
            &existing.name,
            Some(id),
        )
        .await?;
        active.slug = Set(slug);
    }
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(unlimited) = payload.unlimited_stock {
        active.unlimited_stock = Set(unlimited);
    }
    if let Some(weight_g) = payload.weight_g {
        active.weight_g = Set(Some(weight_g));
    }
    if let Some(discount) = payload.discount {
        active.discount = Set(Some(discount));
    }
    if let Some(shipping_from) = payload.shipping_from {
        active.shipping_from = Set(Some(shipping_from));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    if let Some(brand_id) = payload.brand_id {
        active.brand_id = Set(Some(brand_id));
    }
    if let Some(tea_category_id) = payload.tea_category_id {
        active.tea_category_id = Set(Some(tea_category_id));
    }

    if let Some(variations) = payload.variations.as_ref() {
        check_skus_free(&txn, variations, Some(id)).await?;
        ProductVariations::delete_many()
            .filter(VariationCol::ProductId.eq(id))
            .exec(&txn)
            .await?;
        insert_variations(&txn, id, variations).await?;
        active.has_variations = Set(!variations.is_empty());
    }

    active.updated_at = Set(Utc::now().into());
    let product = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "product_update",
        "products",
        serde_json::json!({
            "product_id": product.id,
            "variations_replaced": payload.variations.is_some(),
        }),
    )
    .await;

    let detail = detail_of(state, product.id).await?;
    Ok(ApiResponse::success(
        "Product updated",
        detail,
        Some(Meta::empty()),
    ))
}

/// Past orders keep their own snapshot, so deleting a product never touches them.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(&user.subject),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Restock or write off goods.
///
/// The delta lands on the variation, the plain product counter, or, for a
/// weight-pooled product, on the gram pool. Results below zero are rejected.
pub async fn adjust_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<ProductDetail>> {
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be zero".into()));
    }

    let txn = state.orm.begin().await?;
    let bundle = stock_service::load_any_bundle(&txn, id, true)
        .await?
        .ok_or(AppError::NotFound)?;
    let product_stock = bundle.stock();

    let target = match (product_stock.pooled_weight_g, payload.variation_id) {
        (Some(pool), None) => StockTarget::Pool(pool),
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "weight-pooled products are restocked in grams on the product".into(),
            ));
        }
        (None, Some(variation_id)) => {
            let variation = bundle
                .variation(variation_id)
                .ok_or_else(|| AppError::BadRequest("variation not found".into()))?;
            StockTarget::Variation(variation_id, variation.variation.stock)
        }
        (None, None) if product_stock.has_variations() => {
            return Err(AppError::BadRequest("variation_id is required".into()));
        }
        (None, None) => StockTarget::Product(bundle.product.stock),
    };

    let next = target.current().checked_add(payload.delta).filter(|n| *n >= 0).ok_or_else(|| {
        AppError::BadRequest(format!(
            "stock cannot go below zero (currently {})",
            target.current()
        ))
    })?;

    match target {
        StockTarget::Variation(variation_id, _) => {
            let variation = bundle
                .variation(variation_id)
                .ok_or_else(|| AppError::BadRequest("variation not found".into()))?;
            let mut active: VariationActive = variation.variation.clone().into();
            active.stock = Set(next);
            active.update(&txn).await?;
        }
        StockTarget::Product(_) | StockTarget::Pool(_) => {
            let mut active: ActiveModel = bundle.product.clone().into();
            if matches!(target, StockTarget::Pool(_)) {
                active.weight_g = Set(Some(next));
            } else {
                active.stock = Set(next);
            }
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
        }
    }
    txn.commit().await?;
    tracing::info!(product_id = %id, delta = payload.delta, stock = next, "stock adjusted");

    audit::record(
        &state.pool,
        Some(&user.subject),
        "stock_adjust",
        "products",
        serde_json::json!({
            "product_id": id,
            "variation_id": payload.variation_id,
            "delta": payload.delta,
            "stock": next,
        }),
    )
    .await;

    let detail = detail_of(state, id).await?;
    Ok(ApiResponse::success(
        "Stock adjusted",
        detail,
        Some(Meta::empty()),
    ))
}

#[derive(Debug, Clone, Copy)]
enum StockTarget {
    Variation(Uuid, i32),
    Product(i32),
    Pool(i32),
}

impl StockTarget {
    fn current(&self) -> i32 {
        match *self {
            StockTarget::Variation(_, stock) | StockTarget::Product(stock) => stock,
            StockTarget::Pool(grams) => grams,
        }
    }
}

async fn detail_of(state: &AppState, id: Uuid) -> AppResult<ProductDetail> {
    let bundle = stock_service::load_any_bundle(&state.orm, id, false)
        .await?
        .ok_or(AppError::NotFound)?;
    catalog_service::product_detail(state, bundle).await
}

async fn insert_variations(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    variations: &[VariationInput],
) -> AppResult<()> {
    for input in variations {
        let variation = VariationActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            sku: Set(input.sku.trim().to_string()),
            price: Set(input.price),
            stock: Set(input.stock),
            sort_order: Set(input.sort_order),
            discount: Set(input.discount),
            shipping_from: Set(input.shipping_from.clone()),
            created_at: NotSet,
        }
        .insert(txn)
        .await?;

        for attr in &input.attributes {
            AttributeActive {
                id: Set(Uuid::new_v4()),
                variation_id: Set(variation.id),
                key: Set(attr.key.trim().to_string()),
                value: Set(attr.value.trim().to_string()),
            }
            .insert(txn)
            .await?;
        }
    }
    Ok(())
}

fn check_amounts(price: Option<i64>, stock: Option<i32>, weight_g: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    if weight_g.is_some_and(|w| w < 0) {
        return Err(AppError::BadRequest("weight_g must not be negative".into()));
    }
    Ok(())
}

fn validate_variations(variations: &[VariationInput]) -> AppResult<()> {
    let mut skus = HashSet::new();
    for variation in variations {
        require_text("sku", &variation.sku)?;
        check_amounts(Some(variation.price), Some(variation.stock), None)?;
        check_discount(variation.discount)?;
        if !skus.insert(variation.sku.trim()) {
            return Err(AppError::BadRequest(format!(
                "duplicate sku '{}'",
                variation.sku.trim()
            )));
        }
        let mut keys = HashSet::new();
        for attr in &variation.attributes {
            require_text("attribute key", &attr.key)?;
            if !keys.insert(attr.key.trim().to_ascii_uppercase()) {
                return Err(AppError::BadRequest(format!(
                    "duplicate attribute '{}' on {}",
                    attr.key.trim(),
                    variation.sku.trim()
                )));
            }
            if attr.key.trim().eq_ignore_ascii_case(WEIGHT_ATTRIBUTE)
                && !attr.value.trim().parse::<i32>().is_ok_and(|g| g > 0)
            {
                return Err(AppError::BadRequest(format!(
                    "{WEIGHT_ATTRIBUTE} must be a positive number of grams"
                )));
            }
        }
    }
    Ok(())
}

/// SKUs are unique across the shop; the product's own variations are about to be replaced.
async fn check_skus_free<C: ConnectionTrait>(
    conn: &C,
    variations: &[VariationInput],
    product_id: Option<Uuid>,
) -> AppResult<()> {
    if variations.is_empty() {
        return Ok(());
    }
    let skus: Vec<String> = variations.iter().map(|v| v.sku.trim().to_string()).collect();
    let mut finder = ProductVariations::find()
        .select_only()
        .column(VariationCol::Sku)
        .filter(VariationCol::Sku.is_in(skus));
    if let Some(id) = product_id {
        finder = finder.filter(VariationCol::ProductId.ne(id));
    }
    let taken: Vec<String> = finder.into_tuple::<String>().all(conn).await?;
    match taken.first() {
        Some(sku) => Err(AppError::Conflict(format!("sku '{sku}' is already in use"))),
        None => Ok(()),
    }
}

async fn check_references<C: ConnectionTrait>(
    conn: &C,
    category_id: Option<Uuid>,
    brand_id: Option<Uuid>,
    tea_category_id: Option<Uuid>,
) -> AppResult<()> {
    if let Some(id) = category_id {
        if Categories::find_by_id(id).count(conn).await? == 0 {
            return Err(AppError::BadRequest("category not found".into()));
        }
    }
    if let Some(id) = brand_id {
        if Brands::find_by_id(id).count(conn).await? == 0 {
            return Err(AppError::BadRequest("brand not found".into()));
        }
    }
    if let Some(id) = tea_category_id {
        if TeaCategories::find_by_id(id).count(conn).await? == 0 {
            return Err(AppError::BadRequest("tea category not found".into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::products::AttributeInput;

    fn variation(sku: &str, attrs: &[(&str, &str)]) -> VariationInput {
        VariationInput {
            sku: sku.into(),
            price: 10_000,
            stock: 1,
            sort_order: 0,
            discount: None,
            shipping_from: None,
            attributes: attrs
                .iter()
                .map(|(k, v)| AttributeInput {
                    key: (*k).into(),
                    value: (*v).into(),
                })
                .collect(),
        }
    }

    #[test]
    fn duplicate_skus_are_rejected() {
        let err = validate_variations(&[variation("A-50", &[]), variation(" A-50 ", &[])])
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg.contains("A-50")));
    }

    #[test]
    fn weight_attribute_must_be_positive_grams() {
        assert!(validate_variations(&[variation("A-50", &[("WEIGHT_G", "50")])]).is_ok());
        assert!(validate_variations(&[variation("A-0", &[("weight_g", "0")])]).is_err());
        assert!(validate_variations(&[variation("A-x", &[("WEIGHT_G", "lots")])]).is_err());
    }

    #[test]
    fn attribute_keys_are_unique_per_variation() {
        let result = validate_variations(&[variation("A", &[("Origin", "JP"), ("ORIGIN", "CN")])]);
        assert!(result.is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(check_amounts(Some(-1), None, None).is_err());
        assert!(check_amounts(None, Some(-1), None).is_err());
        assert!(check_amounts(None, None, Some(-5)).is_err());
        assert!(check_amounts(Some(0), Some(0), Some(0)).is_ok());
    }

    #[test]
    fn stock_target_reports_its_counter() {
        assert_eq!(StockTarget::Pool(750).current(), 750);
        assert_eq!(StockTarget::Product(3).current(), 3);
        assert_eq!(StockTarget::Variation(Uuid::nil(), 9).current(), 9);
    }
}
