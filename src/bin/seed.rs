use tea_storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    slug::slugify,
    stock::WEIGHT_ATTRIBUTE,
};
use uuid::Uuid;

struct SeedVariation {
    sku: &'static str,
    price: i64,
    stock: i32,
    weight_g: Option<i32>,
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
    weight_g: Option<i32>,
    discount: Option<i32>,
    category: Uuid,
    tea_category: Option<Uuid>,
    brand: Option<Uuid>,
    variations: Vec<SeedVariation>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let tea = ensure_taxonomy(&pool, "categories", "Tea", false).await?;
    let accessories = ensure_taxonomy(&pool, "categories", "Accessories", false).await?;
    let gift_cards = ensure_taxonomy(&pool, "categories", "Gift cards", true).await?;
    let green = ensure_taxonomy(&pool, "tea_categories", "Green tea", false).await?;
    let oolong = ensure_taxonomy(&pool, "tea_categories", "Oolong", false).await?;
    let brand = ensure_taxonomy(&pool, "brands", "Mountain Garden", false).await?;

    let products = vec![
        SeedProduct {
            name: "Sencha Kagoshima",
            description: "Steamed green tea with a grassy, sweet finish",
            price: 18_000,
            stock: 0,
            weight_g: Some(2_000),
            discount: None,
            category: tea,
            tea_category: Some(green),
            brand: Some(brand),
            variations: vec![
                SeedVariation { sku: "SENCHA-50", price: 18_000, stock: 0, weight_g: Some(50) },
                SeedVariation { sku: "SENCHA-100", price: 32_000, stock: 0, weight_g: Some(100) },
                SeedVariation { sku: "SENCHA-250", price: 72_000, stock: 0, weight_g: Some(250) },
            ],
        },
        SeedProduct {
            name: "Milky Oolong",
            description: "Lightly oxidised oolong with a creamy aroma",
            price: 21_000,
            stock: 0,
            weight_g: None,
            discount: Some(10),
            category: tea,
            tea_category: Some(oolong),
            brand: Some(brand),
            variations: vec![
                SeedVariation { sku: "OOLONG-TIN", price: 21_000, stock: 12, weight_g: None },
                SeedVariation { sku: "OOLONG-BAG", price: 17_500, stock: 30, weight_g: None },
            ],
        },
        SeedProduct {
            name: "Kyusu Teapot",
            description: "Side-handle clay teapot, 300 ml",
            price: 89_000,
            stock: 5,
            weight_g: None,
            discount: None,
            category: accessories,
            tea_category: None,
            brand: None,
            variations: Vec::new(),
        },
        SeedProduct {
            name: "Gift Card 500",
            description: "Redeemable for anything in the shop",
            price: 50_000,
            stock: 0,
            weight_g: None,
            discount: None,
            category: gift_cards,
            tea_category: None,
            brand: None,
            variations: Vec::new(),
        },
    ];

    for product in &products {
        seed_product(&pool, product).await?;
    }
    seed_blog_post(&pool, green).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_taxonomy(
    pool: &sqlx::PgPool,
    table: &str,
    name: &str,
    unlimited_stock: bool,
) -> anyhow::Result<Uuid> {
    let slug = slugify(name);
    let existing: Option<(Uuid,)> = sqlx::query_as(&format!("SELECT id FROM {table} WHERE slug = $1"))
        .bind(&slug)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    if table == "categories" {
        sqlx::query("INSERT INTO categories (id, name, slug, unlimited_stock) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(name)
            .bind(&slug)
            .bind(unlimited_stock)
            .execute(pool)
            .await?;
    } else {
        sqlx::query(&format!("INSERT INTO {table} (id, name, slug) VALUES ($1, $2, $3)"))
            .bind(id)
            .bind(name)
            .bind(&slug)
            .execute(pool)
            .await?;
    }

    println!("Ensured {table} entry {name}");
    Ok(id)
}

async fn seed_product(pool: &sqlx::PgPool, product: &SeedProduct) -> anyhow::Result<()> {
    let id = Uuid::new_v4();
    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, slug, description, price, stock, has_variations,
                              weight_g, discount, category_id, brand_id, tea_category_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (slug) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(product.name)
    .bind(slugify(product.name))
    .bind(product.description)
    .bind(product.price)
    .bind(product.stock)
    .bind(!product.variations.is_empty())
    .bind(product.weight_g)
    .bind(product.discount)
    .bind(product.category)
    .bind(product.brand)
    .bind(product.tea_category)
    .fetch_optional(pool)
    .await?;

    // Already seeded; leave its variations alone.
    if inserted.is_none() {
        return Ok(());
    }

    for (sort_order, variation) in product.variations.iter().enumerate() {
        let variation_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO product_variations (id, product_id, sku, price, stock, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(variation_id)
        .bind(id)
        .bind(variation.sku)
        .bind(variation.price)
        .bind(variation.stock)
        .bind(i32::try_from(sort_order)?)
        .execute(pool)
        .await?;

        if let Some(weight) = variation.weight_g {
            sqlx::query(
                "INSERT INTO variation_attributes (id, variation_id, key, value) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(variation_id)
            .bind(WEIGHT_ATTRIBUTE)
            .bind(weight.to_string())
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded product {}", product.name);
    Ok(())
}

async fn seed_blog_post(pool: &sqlx::PgPool, tea_category: Uuid) -> anyhow::Result<()> {
    let id = Uuid::new_v4();
    let inserted: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO blog_posts (id, title, slug, excerpt, content, published, published_at)
        VALUES ($1, $2, $3, $4, $5, TRUE, NOW())
        ON CONFLICT (slug) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(id)
    .bind("Brewing sencha")
    .bind("brewing-sencha")
    .bind("Lower the water temperature and keep the first steep short.")
    .bind("Use 5 g of leaves per 150 ml, water at 70 °C and steep for one minute.")
    .fetch_optional(pool)
    .await?;

    if inserted.is_some() {
        sqlx::query(
            "INSERT INTO blog_post_tea_categories (blog_post_id, tea_category_id) VALUES ($1, $2)",
        )
        .bind(id)
        .bind(tea_category)
        .execute(pool)
        .await?;
        println!("Seeded blog post");
    }
    Ok(())
}
