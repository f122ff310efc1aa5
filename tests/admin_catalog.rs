mod common;

use tea_storefront_api::{
    dto::{
        blog::{CreateBlogPostRequest, UpdateBlogPostRequest},
        products::{CreateProductRequest, StockAdjustRequest, UpdateProductRequest, VariationInput},
        taxonomy::{CreateCategoryRequest, CreateTeaCategoryRequest, UpdateCategoryRequest},
    },
    error::AppError,
    routes::params::{BlogQuery, ProductQuery},
    services::{blog_service, catalog_service, product_service, taxonomy_service},
    stock::Availability,
};
use uuid::Uuid;

fn product(name: &str, category_id: Option<Uuid>) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        slug: None,
        description: Some("Loose leaf".into()),
        price: 12_000,
        stock: 2,
        unlimited_stock: false,
        weight_g: None,
        discount: None,
        shipping_from: None,
        image_url: None,
        active: None,
        category_id,
        brand_id: None,
        tea_category_id: None,
        variations: Vec::new(),
    }
}

fn plain_variation(sku: &str, stock: i32) -> VariationInput {
    VariationInput {
        sku: sku.into(),
        price: 8_000,
        stock,
        sort_order: 0,
        discount: None,
        shipping_from: None,
        attributes: Vec::new(),
    }
}

// Dashboard edits: slugs, stock corrections, category-wide unlimited stock and blog publishing.
#[tokio::test]
async fn dashboard_manages_catalog_and_blog() -> anyhow::Result<()> {
    let Some(state) = common::db_state().await? else {
        return Ok(());
    };
    let admin = common::admin();

    let category = taxonomy_service::create_category(
        &state,
        &admin,
        CreateCategoryRequest {
            name: "Čaje z Číny".into(),
            slug: None,
            description: None,
            unlimited_stock: false,
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(category.slug, "caje-z-ciny");

    let first = product_service::create_product(&state, &admin, product("Dian Hong", Some(category.id)))
        .await?
        .data
        .expect("product");
    let second = product_service::create_product(&state, &admin, product("Dian Hong", Some(category.id)))
        .await?
        .data
        .expect("product");
    assert_eq!(first.product.slug, "dian-hong");
    assert_ne!(second.product.slug, first.product.slug);
    assert!(second.product.slug.starts_with("dian-hong-"));

    let taken = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            slug: Some("dian-hong".into()),
            ..product("Another", None)
        },
    )
    .await;
    assert!(matches!(taken, Err(AppError::Conflict(_))));

    // Stock corrections never go below zero.
    let adjusted = product_service::adjust_stock(
        &state,
        &admin,
        first.product.id,
        StockAdjustRequest {
            variation_id: None,
            delta: 5,
        },
    )
    .await?
    .data
    .expect("detail");
    assert_eq!(adjusted.product.stock, 7);
    let negative = product_service::adjust_stock(
        &state,
        &admin,
        first.product.id,
        StockAdjustRequest {
            variation_id: None,
            delta: -8,
        },
    )
    .await;
    assert!(matches!(negative, Err(AppError::BadRequest(_))));

    // Replacing variations switches the product to per-variation stock.
    let with_variations = product_service::update_product(
        &state,
        &admin,
        second.product.id,
        UpdateProductRequest {
            name: None,
            slug: None,
            description: None,
            price: None,
            stock: None,
            unlimited_stock: None,
            weight_g: None,
            discount: Some(20),
            shipping_from: None,
            image_url: None,
            active: None,
            category_id: None,
            brand_id: None,
            tea_category_id: None,
            variations: Some(vec![plain_variation("DH-TIN", 4), plain_variation("DH-BAG", 0)]),
        },
    )
    .await?
    .data
    .expect("detail");
    assert!(with_variations.product.has_variations);
    assert_eq!(with_variations.variations.len(), 2);
    assert_eq!(with_variations.availability.len(), 2);

    let taken_sku = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            variations: vec![plain_variation("DH-TIN", 1)],
            ..product("Copycat", None)
        },
    )
    .await;
    assert!(matches!(taken_sku, Err(AppError::Conflict(_))));

    // Unlimited stock on the category lifts the cap for its products.
    taxonomy_service::update_category(
        &state,
        &admin,
        category.id,
        UpdateCategoryRequest {
            name: None,
            slug: None,
            description: None,
            unlimited_stock: Some(true),
        },
    )
    .await?;
    let detail = catalog_service::get_product_by_slug(&state, &first.product.slug)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.availability[0].availability, Availability::Unlimited);
    assert_eq!(detail.category.map(|c| c.id), Some(category.id));

    let listed = catalog_service::list_products(
        &state,
        ProductQuery {
            category: Some(category.slug.clone()),
            ..ProductQuery::default()
        },
        false,
    )
    .await?;
    assert_eq!(listed.meta.and_then(|m| m.total), Some(2));

    let catalog = catalog_service::catalog(&state).await?.data.expect("catalog");
    assert!(catalog.items.iter().all(|entry| entry.unlimited_stock));

    // Drafts stay hidden until published; publishing stamps the date once.
    let tea_category = taxonomy_service::create_tea_category(
        &state,
        &admin,
        CreateTeaCategoryRequest {
            name: "Black tea".into(),
            slug: None,
            description: None,
        },
    )
    .await?
    .data
    .expect("tea category");

    let draft = blog_service::create_post(
        &state,
        &admin,
        CreateBlogPostRequest {
            title: "Yunnan harvest".into(),
            slug: None,
            excerpt: None,
            content: "Spring picking has started.".into(),
            published: false,
            product_id: Some(first.product.id),
            tea_category_ids: vec![tea_category.id],
        },
    )
    .await?
    .data
    .expect("post");
    assert!(draft.post.published_at.is_none());
    assert_eq!(draft.tea_categories.len(), 1);

    let hidden = blog_service::get_published_post(&state, &draft.post.slug).await;
    assert!(matches!(hidden, Err(AppError::NotFound)));

    let published = blog_service::update_post(
        &state,
        &admin,
        draft.post.id,
        UpdateBlogPostRequest {
            title: None,
            slug: None,
            excerpt: None,
            content: None,
            published: Some(true),
            product_id: None,
            tea_category_ids: None,
        },
    )
    .await?
    .data
    .expect("post");
    assert!(published.post.published_at.is_some());

    let public = blog_service::list_posts(
        &state,
        BlogQuery {
            tea_category: Some(tea_category.slug.clone()),
            ..BlogQuery::default()
        },
        false,
    )
    .await?
    .data
    .expect("posts");
    assert_eq!(public.items.len(), 1);
    let listed = &public.items[0];
    assert_eq!(listed.post.id, draft.post.id);
    assert_eq!(
        listed.tea_categories.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![tea_category.id]
    );
    assert_eq!(listed.product.as_ref().map(|p| p.id), Some(first.product.id));

    let detail = blog_service::get_published_post(&state, &published.post.slug)
        .await?
        .data
        .expect("post");
    assert_eq!(detail.product.map(|p| p.id), Some(first.product.id));

    Ok(())
}
