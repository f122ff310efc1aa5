use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{cart::AttributeSnapshot, entity};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub unlimited_stock: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeaCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub unlimited_stock: bool,
    pub has_variations: bool,
    pub weight_g: Option<i32>,
    pub discount: Option<i32>,
    pub shipping_from: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub tea_category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VariationAttribute {
    pub id: Uuid,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductVariation {
    pub id: Uuid,
    pub product_id: Uuid,
    pub sku: String,
    pub price: i64,
    pub stock: i32,
    pub sort_order: i32,
    pub discount: Option<i32>,
    pub shipping_from: Option<String>,
    pub attributes: Vec<VariationAttribute>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub product_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub subtotal: i64,
    pub discount_total: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variation_id: Option<Uuid>,
    pub product_name: String,
    pub sku: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    pub discount: Option<i32>,
    pub line_total: i64,
    pub attributes: Vec<AttributeSnapshot>,
    pub shipping_from: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub id: Uuid,
    pub order_id: Uuid,
    pub kind: String,
    pub name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.street.clone(),
            format!("{} {}", self.postal_code, self.city),
            self.country.clone(),
        ]
    }
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            unlimited_stock: model.unlimited_stock,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::tea_categories::Model> for TeaCategory {
    fn from(model: entity::tea_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::brands::Model> for Brand {
    fn from(model: entity::brands::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            website: model.website,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::products::Model> for Product {
    fn from(model: entity::products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            price: model.price,
            stock: model.stock,
            unlimited_stock: model.unlimited_stock,
            has_variations: model.has_variations,
            weight_g: model.weight_g,
            discount: model.discount,
            shipping_from: model.shipping_from,
            image_url: model.image_url,
            active: model.active,
            category_id: model.category_id,
            brand_id: model.brand_id,
            tea_category_id: model.tea_category_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::variation_attributes::Model> for VariationAttribute {
    fn from(model: entity::variation_attributes::Model) -> Self {
        Self {
            id: model.id,
            key: model.key,
            value: model.value,
        }
    }
}

impl ProductVariation {
    pub fn from_entity(
        model: entity::product_variations::Model,
        attributes: Vec<entity::variation_attributes::Model>,
    ) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            sku: model.sku,
            price: model.price,
            stock: model.stock,
            sort_order: model.sort_order,
            discount: model.discount,
            shipping_from: model.shipping_from,
            attributes: attributes.into_iter().map(Into::into).collect(),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::blog_posts::Model> for BlogPost {
    fn from(model: entity::blog_posts::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            excerpt: model.excerpt,
            content: model.content,
            published: model.published,
            published_at: model.published_at.map(|dt| dt.with_timezone(&Utc)),
            product_id: model.product_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            order_number: model.order_number,
            customer_name: model.customer_name,
            email: model.email,
            phone: model.phone,
            note: model.note,
            status: model.status,
            payment_status: model.payment_status,
            subtotal: model.subtotal,
            discount_total: model.discount_total,
            total_amount: model.total_amount,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::order_items::Model> for OrderItem {
    fn from(model: entity::order_items::Model) -> Self {
        let attributes = serde_json::from_value(model.attributes).unwrap_or_else(|err| {
            tracing::warn!(error = %err, order_item = %model.id, "unreadable attribute snapshot");
            Vec::new()
        });
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            variation_id: model.variation_id,
            product_name: model.product_name,
            sku: model.sku,
            quantity: model.quantity,
            unit_price: model.unit_price,
            discount: model.discount,
            line_total: model.line_total,
            attributes,
            shipping_from: model.shipping_from,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<entity::addresses::Model> for Address {
    fn from(model: entity::addresses::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            kind: model.kind,
            name: model.name,
            street: model.street,
            city: model.city,
            postal_code: model.postal_code,
            country: model.country,
        }
    }
}
