use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Brand, Category, Product, ProductVariation, TeaCategory},
    stock::Availability,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttributeInput {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VariationInput {
    pub sku: String,
    pub price: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub sort_order: i32,
    pub discount: Option<i32>,
    pub shipping_from: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub unlimited_stock: bool,
    pub weight_g: Option<i32>,
    pub discount: Option<i32>,
    pub shipping_from: Option<String>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub tea_category_id: Option<Uuid>,
    #[serde(default)]
    pub variations: Vec<VariationInput>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub unlimited_stock: Option<bool>,
    pub weight_g: Option<i32>,
    pub discount: Option<i32>,
    pub shipping_from: Option<String>,
    pub image_url: Option<String>,
    pub active: Option<bool>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub tea_category_id: Option<Uuid>,
    /// Replaces every variation of the product when present.
    pub variations: Option<Vec<VariationInput>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustRequest {
    pub variation_id: Option<Uuid>,
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub price: i64,
    pub discount: Option<i32>,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.price,
            discount: product.discount,
            image_url: product.image_url.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariationAvailability {
    pub variation_id: Option<Uuid>,
    pub availability: Availability,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub variations: Vec<ProductVariation>,
    pub category: Option<Category>,
    pub brand: Option<Brand>,
    pub tea_category: Option<TeaCategory>,
    /// Stock with nothing reserved, per variation (or once for plain products).
    pub availability: Vec<VariationAvailability>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogVariation {
    pub id: Uuid,
    pub sku: String,
    pub price: i64,
    pub discount: Option<i32>,
    pub stock: i32,
    pub weight_g: Option<i32>,
}

/// Compact entry of the client-side catalog cache.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogEntry {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub price: i64,
    pub discount: Option<i32>,
    pub stock: i32,
    pub unlimited_stock: bool,
    pub pooled_weight_g: Option<i32>,
    pub variations: Vec<CatalogVariation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Catalog {
    pub items: Vec<CatalogEntry>,
}
