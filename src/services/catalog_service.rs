use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use crate::{
    dto::{
        products::{
            Catalog, CatalogEntry, CatalogVariation, ProductDetail, ProductList,
            VariationAvailability,
        },
        taxonomy::{BrandList, CategoryList, TeaCategoryList},
    },
    entity::{
        brands::{Column as BrandCol, Entity as Brands},
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products, Relation as ProdRel},
        tea_categories::{Column as TeaCol, Entity as TeaCategories},
    },
    error::{AppError, AppResult},
    models::{Brand, Category, Product, ProductVariation, TeaCategory},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    services::stock_service::{self, ProductBundle},
    state::AppState,
    stock::{self, Reservation},
};

/// Paginated product listing. The storefront sees active products only.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
    include_inactive: bool,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if !include_inactive {
        condition = condition.add(ProdCol::Active.eq(true));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.trim().is_empty()) {
        let pattern = contains_pattern(search.trim());
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Products, ProdCol::Name)).ilike(pattern.clone()))
                .add(Expr::col((Products, ProdCol::Description)).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(ProdCol::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(ProdCol::Price.lte(max_price));
    }

    let mut finder = Products::find();
    if let Some(slug) = query.category.as_ref().filter(|s| !s.is_empty()) {
        finder = finder.join(JoinType::InnerJoin, ProdRel::Categories.def());
        condition = condition.add(CategoryCol::Slug.eq(slug.clone()));
    }
    if let Some(slug) = query.brand.as_ref().filter(|s| !s.is_empty()) {
        finder = finder.join(JoinType::InnerJoin, ProdRel::Brands.def());
        condition = condition.add(BrandCol::Slug.eq(slug.clone()));
    }
    if let Some(slug) = query.tea_category.as_ref().filter(|s| !s.is_empty()) {
        finder = finder.join(JoinType::InnerJoin, ProdRel::TeaCategories.def());
        condition = condition.add(TeaCol::Slug.eq(slug.clone()));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => ProdCol::CreatedAt,
        ProductSortBy::Price => ProdCol::Price,
        ProductSortBy::Name => ProdCol::Name,
    };

    let mut finder = finder.filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

/// `ILIKE` pattern matching `term` literally anywhere in the column.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub async fn get_product_by_slug(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<ProductDetail>> {
    let id: Uuid = Products::find()
        .select_only()
        .column(ProdCol::Id)
        .filter(ProdCol::Slug.eq(slug))
        .filter(ProdCol::Active.eq(true))
        .into_tuple::<Uuid>()
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let bundle = stock_service::load_bundle(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = product_detail(state, bundle).await?;
    Ok(ApiResponse::success("Product", detail, None))
}

pub(crate) async fn product_detail(
    state: &AppState,
    bundle: ProductBundle,
) -> AppResult<ProductDetail> {
    let category = match bundle.product.category_id {
        Some(id) => Categories::find_by_id(id).one(&state.orm).await?.map(Category::from),
        None => None,
    };
    let brand = match bundle.product.brand_id {
        Some(id) => Brands::find_by_id(id).one(&state.orm).await?.map(Brand::from),
        None => None,
    };
    let tea_category = match bundle.product.tea_category_id {
        Some(id) => TeaCategories::find_by_id(id)
            .one(&state.orm)
            .await?
            .map(TeaCategory::from),
        None => None,
    };

    let availability = availability_of(&bundle)?;
    let ProductBundle {
        product,
        variations,
        ..
    } = bundle;

    Ok(ProductDetail {
        product: product.into(),
        variations: variations
            .into_iter()
            .map(|v| ProductVariation::from_entity(v.variation, v.attributes))
            .collect(),
        category,
        brand,
        tea_category,
        availability,
    })
}

/// Availability with an empty cart, for every purchasable line of the product.
fn availability_of(bundle: &ProductBundle) -> AppResult<Vec<VariationAvailability>> {
    let product_stock = bundle.stock();
    let none: [NoReservation; 0] = [];
    let keys: Vec<Option<Uuid>> = if product_stock.has_variations() {
        product_stock.variations.iter().map(|v| Some(v.id)).collect()
    } else {
        vec![None]
    };
    keys.into_iter()
        .map(|variation_id| -> AppResult<VariationAvailability> {
            let availability =
                stock::available_quantity(&product_stock, variation_id, &none, None)?;
            Ok(VariationAvailability {
                variation_id,
                availability,
            })
        })
        .collect()
}

enum NoReservation {}

impl Reservation for NoReservation {
    fn product_id(&self) -> Uuid {
        match *self {}
    }
    fn variation_id(&self) -> Option<Uuid> {
        match *self {}
    }
    fn quantity(&self) -> u32 {
        match *self {}
    }
}

/// Every active product with the figures the client needs to validate a cart offline.
pub async fn catalog(state: &AppState) -> AppResult<ApiResponse<Catalog>> {
    let ids: Vec<Uuid> = Products::find()
        .select_only()
        .column(ProdCol::Id)
        .filter(ProdCol::Active.eq(true))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?;
    let bundles = stock_service::load_bundles(&state.orm, &ids, false).await?;

    let mut items: Vec<CatalogEntry> = bundles.values().map(catalog_entry).collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Catalog", Catalog { items }, Some(meta)))
}

fn catalog_entry(bundle: &ProductBundle) -> CatalogEntry {
    let product_stock = bundle.stock();
    CatalogEntry {
        id: bundle.product.id,
        slug: bundle.product.slug.clone(),
        name: bundle.product.name.clone(),
        price: bundle.product.price,
        discount: bundle.product.discount,
        stock: bundle.product.stock,
        unlimited_stock: product_stock.unlimited_stock,
        pooled_weight_g: product_stock.pooled_weight_g,
        variations: bundle
            .variations
            .iter()
            .map(|v| CatalogVariation {
                id: v.variation.id,
                sku: v.variation.sku.clone(),
                price: v.variation.price,
                discount: v.variation.discount,
                stock: v.variation.stock,
                weight_g: v.weight_g(),
            })
            .collect(),
    }
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn list_tea_categories(state: &AppState) -> AppResult<ApiResponse<TeaCategoryList>> {
    let items: Vec<TeaCategory> = TeaCategories::find()
        .order_by_asc(TeaCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(TeaCategory::from)
        .collect();
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success(
        "Tea categories",
        TeaCategoryList { items },
        Some(meta),
    ))
}

pub async fn list_brands(state: &AppState) -> AppResult<ApiResponse<BrandList>> {
    let items: Vec<Brand> = Brands::find()
        .order_by_asc(BrandCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Brand::from)
        .collect();
    let meta = Meta::all(items.len());
    Ok(ApiResponse::success("Brands", BrandList { items }, Some(meta)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_wildcards_match_literally() {
        assert_eq!(contains_pattern("sencha"), "%sencha%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("gift_card"), "%gift\\_card%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }
}
