use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Condition, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        blog::{BlogPostDetail, BlogPostList, CreateBlogPostRequest, UpdateBlogPostRequest},
        products::ProductSummary,
    },
    entity::{
        blog_post_tea_categories::{
            ActiveModel as LinkActive, Column as LinkCol, Entity as BlogPostTeaCategories,
            Relation as LinkRel,
        },
        blog_posts::{
            ActiveModel, Column, Entity as BlogPosts, Model as BlogPostModel, Relation as PostRel,
        },
        products::{Column as ProdCol, Entity as Products},
        tea_categories::{Column as TeaCol, Entity as TeaCategories},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Product, TeaCategory},
    response::{ApiResponse, Meta},
    routes::params::BlogQuery,
    services::{require_text, resolve_slug},
    state::AppState,
};

/// Newest first. Drafts are only listed for the dashboard.
pub async fn list_posts(
    state: &AppState,
    query: BlogQuery,
    include_drafts: bool,
) -> AppResult<ApiResponse<BlogPostList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if !include_drafts {
        condition = condition.add(Column::Published.eq(true));
    }

    let mut finder = BlogPosts::find();
    if let Some(slug) = query.tea_category.as_ref().filter(|s| !s.is_empty()) {
        finder = finder
            .join(JoinType::InnerJoin, PostRel::BlogPostTeaCategories.def())
            .join(JoinType::InnerJoin, LinkRel::TeaCategories.def());
        condition = condition.add(TeaCol::Slug.eq(slug.clone()));
    }

    let finder = finder
        .filter(condition)
        .order_by_desc(Column::PublishedAt)
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let posts = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = post_details(&state.orm, posts, !include_drafts).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Blog posts", BlogPostList { items }, Some(meta)))
}

pub async fn get_published_post(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<BlogPostDetail>> {
    let post = BlogPosts::find()
        .filter(Column::Slug.eq(slug))
        .filter(Column::Published.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = post_detail(&state.orm, post, true).await?;
    Ok(ApiResponse::success("Blog post", detail, None))
}

pub async fn get_post(state: &AppState, id: Uuid) -> AppResult<ApiResponse<BlogPostDetail>> {
    let post = BlogPosts::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = post_detail(&state.orm, post, false).await?;
    Ok(ApiResponse::success("Blog post", detail, None))
}

pub async fn create_post(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBlogPostRequest,
) -> AppResult<ApiResponse<BlogPostDetail>> {
    require_text("title", &payload.title)?;
    require_text("content", &payload.content)?;

    let txn = state.orm.begin().await?;
    check_product(&txn, payload.product_id).await?;
    check_tea_categories(&txn, &payload.tea_category_ids).await?;

    let slug = resolve_slug::<BlogPosts, _>(
        &txn,
        Column::Slug,
        Column::Id,
        payload.slug.as_deref(),
        &payload.title,
        None,
    )
    .await?;

    let post = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title.trim().to_string()),
        slug: Set(slug),
        excerpt: Set(payload.excerpt),
        content: Set(payload.content),
        published: Set(payload.published),
        published_at: Set(payload.published.then(|| Utc::now().into())),
        product_id: Set(payload.product_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;
    link_tea_categories(&txn, post.id, &payload.tea_category_ids).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "blog_post_create",
        "blog_posts",
        serde_json::json!({ "post_id": post.id, "published": post.published }),
    )
    .await;

    let detail = post_detail(&state.orm, post, false).await?;
    Ok(ApiResponse::success(
        "Blog post created",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn update_post(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBlogPostRequest,
) -> AppResult<ApiResponse<BlogPostDetail>> {
    let txn = state.orm.begin().await?;
    let existing = BlogPosts::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    check_product(&txn, payload.product_id).await?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(requested) = payload.slug.as_deref() {
        active.slug = Set(resolve_slug::<BlogPosts, _>(
            &txn,
            Column::Slug,
            Column::Id,
            Some(requested),
            &existing.title,
            Some(id),
        )
        .await?);
    }
    if let Some(title) = payload.title {
        require_text("title", &title)?;
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        require_text("content", &content)?;
        active.content = Set(content);
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(Some(excerpt));
    }
    if let Some(product_id) = payload.product_id {
        active.product_id = Set(Some(product_id));
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
        if published && existing.published_at.is_none() {
            active.published_at = Set(Some(Utc::now().into()));
        }
    }
    if let Some(ids) = payload.tea_category_ids.as_ref() {
        check_tea_categories(&txn, ids).await?;
        BlogPostTeaCategories::delete_many()
            .filter(LinkCol::BlogPostId.eq(id))
            .exec(&txn)
            .await?;
        link_tea_categories(&txn, id, ids).await?;
    }

    active.updated_at = Set(Utc::now().into());
    let post = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        Some(&user.subject),
        "blog_post_update",
        "blog_posts",
        serde_json::json!({ "post_id": post.id, "published": post.published }),
    )
    .await;

    let detail = post_detail(&state.orm, post, false).await?;
    Ok(ApiResponse::success(
        "Blog post updated",
        detail,
        Some(Meta::empty()),
    ))
}

pub async fn delete_post(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = BlogPosts::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(&user.subject),
        "blog_post_delete",
        "blog_posts",
        serde_json::json!({ "post_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Blog post deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

async fn post_detail<C: ConnectionTrait>(
    conn: &C,
    post: BlogPostModel,
    active_product_only: bool,
) -> AppResult<BlogPostDetail> {
    post_details(conn, vec![post], active_product_only)
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

/// Attach tea categories and the linked product to each post, keeping order.
async fn post_details<C: ConnectionTrait>(
    conn: &C,
    posts: Vec<BlogPostModel>,
    active_product_only: bool,
) -> AppResult<Vec<BlogPostDetail>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let mut tea_by_post: HashMap<Uuid, Vec<TeaCategory>> = HashMap::new();
    let links = BlogPostTeaCategories::find()
        .filter(LinkCol::BlogPostId.is_in(post_ids))
        .find_also_related(TeaCategories)
        .all(conn)
        .await?;
    for (link, tea) in links {
        if let Some(tea) = tea {
            tea_by_post
                .entry(link.blog_post_id)
                .or_default()
                .push(tea.into());
        }
    }
    for teas in tea_by_post.values_mut() {
        teas.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let product_ids: HashSet<Uuid> = posts.iter().filter_map(|p| p.product_id).collect();
    let mut products: HashMap<Uuid, ProductSummary> = HashMap::new();
    if !product_ids.is_empty() {
        let mut finder = Products::find().filter(ProdCol::Id.is_in(product_ids));
        if active_product_only {
            finder = finder.filter(ProdCol::Active.eq(true));
        }
        for product in finder.all(conn).await? {
            let product = Product::from(product);
            products.insert(product.id, ProductSummary::from(&product));
        }
    }

    Ok(posts
        .into_iter()
        .map(|post| BlogPostDetail {
            tea_categories: tea_by_post.remove(&post.id).unwrap_or_default(),
            product: post.product_id.and_then(|id| products.get(&id).cloned()),
            post: post.into(),
        })
        .collect())
}

async fn check_product<C: ConnectionTrait>(conn: &C, product_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = product_id {
        if Products::find_by_id(id).count(conn).await? == 0 {
            return Err(AppError::BadRequest("product not found".into()));
        }
    }
    Ok(())
}

async fn check_tea_categories<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> AppResult<()> {
    let unique: HashSet<Uuid> = ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }
    let found = TeaCategories::find()
        .filter(TeaCol::Id.is_in(unique.iter().copied()))
        .count(conn)
        .await?;
    if found as usize != unique.len() {
        return Err(AppError::BadRequest("tea category not found".into()));
    }
    Ok(())
}

async fn link_tea_categories<C: ConnectionTrait>(
    conn: &C,
    post_id: Uuid,
    ids: &[Uuid],
) -> AppResult<()> {
    let unique: HashSet<Uuid> = ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }
    let links = unique.into_iter().map(|tea_category_id| LinkActive {
        blog_post_id: Set(post_id),
        tea_category_id: Set(tea_category_id),
    });
    BlogPostTeaCategories::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
