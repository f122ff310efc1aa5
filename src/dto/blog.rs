use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::products::ProductSummary,
    models::{BlogPost, TeaCategory},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlogPostRequest {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub published: bool,
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub tea_category_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBlogPostRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub product_id: Option<Uuid>,
    /// Replaces the linked tea categories when present.
    pub tea_category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogPostDetail {
    pub post: BlogPost,
    pub tea_categories: Vec<TeaCategory>,
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlogPostList {
    pub items: Vec<BlogPostDetail>,
}
