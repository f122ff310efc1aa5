use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::taxonomy::{
        CreateBrandRequest, CreateCategoryRequest, CreateTeaCategoryRequest, UpdateBrandRequest,
        UpdateCategoryRequest, UpdateTeaCategoryRequest,
    },
    entity::{
        brands::{ActiveModel as BrandActive, Column as BrandCol, Entity as Brands},
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        tea_categories::{ActiveModel as TeaActive, Column as TeaCol, Entity as TeaCategories},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Brand, Category, TeaCategory},
    response::{ApiResponse, Meta},
    services::{require_text, resolve_slug},
    state::AppState,
};

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    require_text("name", &payload.name)?;
    let slug = resolve_slug::<Categories, _>(
        &state.orm,
        CategoryCol::Slug,
        CategoryCol::Id,
        payload.slug.as_deref(),
        &payload.name,
        None,
    )
    .await?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        unlimited_stock: Set(payload.unlimited_stock),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    record(state, user, "category_create", "categories", category.id).await;
    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// Toggling `unlimited_stock` here changes availability of every product in the category.
pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CategoryActive = existing.clone().into();
    if let Some(requested) = payload.slug.as_deref() {
        active.slug = Set(resolve_slug::<Categories, _>(
            &state.orm,
            CategoryCol::Slug,
            CategoryCol::Id,
            Some(requested),
            &existing.name,
            Some(id),
        )
        .await?);
    }
    if let Some(name) = payload.name {
        require_text("name", &name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(unlimited) = payload.unlimited_stock {
        active.unlimited_stock = Set(unlimited);
    }
    let category = active.update(&state.orm).await?;

    record(state, user, "category_update", "categories", category.id).await;
    Ok(ApiResponse::success(
        "Category updated",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Categories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    record(state, user, "category_delete", "categories", id).await;
    Ok(deleted("Category deleted", id))
}

pub async fn create_tea_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTeaCategoryRequest,
) -> AppResult<ApiResponse<TeaCategory>> {
    require_text("name", &payload.name)?;
    let slug = resolve_slug::<TeaCategories, _>(
        &state.orm,
        TeaCol::Slug,
        TeaCol::Id,
        payload.slug.as_deref(),
        &payload.name,
        None,
    )
    .await?;

    let tea_category = TeaActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    record(state, user, "tea_category_create", "tea_categories", tea_category.id).await;
    Ok(ApiResponse::success(
        "Tea category created",
        TeaCategory::from(tea_category),
        Some(Meta::empty()),
    ))
}

pub async fn update_tea_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTeaCategoryRequest,
) -> AppResult<ApiResponse<TeaCategory>> {
    let existing = TeaCategories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: TeaActive = existing.clone().into();
    if let Some(requested) = payload.slug.as_deref() {
        active.slug = Set(resolve_slug::<TeaCategories, _>(
            &state.orm,
            TeaCol::Slug,
            TeaCol::Id,
            Some(requested),
            &existing.name,
            Some(id),
        )
        .await?);
    }
    if let Some(name) = payload.name {
        require_text("name", &name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    let tea_category = active.update(&state.orm).await?;

    record(state, user, "tea_category_update", "tea_categories", tea_category.id).await;
    Ok(ApiResponse::success(
        "Tea category updated",
        TeaCategory::from(tea_category),
        Some(Meta::empty()),
    ))
}

pub async fn delete_tea_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = TeaCategories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    record(state, user, "tea_category_delete", "tea_categories", id).await;
    Ok(deleted("Tea category deleted", id))
}

pub async fn create_brand(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBrandRequest,
) -> AppResult<ApiResponse<Brand>> {
    require_text("name", &payload.name)?;
    let slug = resolve_slug::<Brands, _>(
        &state.orm,
        BrandCol::Slug,
        BrandCol::Id,
        payload.slug.as_deref(),
        &payload.name,
        None,
    )
    .await?;

    let brand = BrandActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(slug),
        description: Set(payload.description),
        website: Set(payload.website),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    record(state, user, "brand_create", "brands", brand.id).await;
    Ok(ApiResponse::success(
        "Brand created",
        Brand::from(brand),
        Some(Meta::empty()),
    ))
}

pub async fn update_brand(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBrandRequest,
) -> AppResult<ApiResponse<Brand>> {
    let existing = Brands::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: BrandActive = existing.clone().into();
    if let Some(requested) = payload.slug.as_deref() {
        active.slug = Set(resolve_slug::<Brands, _>(
            &state.orm,
            BrandCol::Slug,
            BrandCol::Id,
            Some(requested),
            &existing.name,
            Some(id),
        )
        .await?);
    }
    if let Some(name) = payload.name {
        require_text("name", &name)?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(website) = payload.website {
        active.website = Set(Some(website));
    }
    let brand = active.update(&state.orm).await?;

    record(state, user, "brand_update", "brands", brand.id).await;
    Ok(ApiResponse::success(
        "Brand updated",
        Brand::from(brand),
        Some(Meta::empty()),
    ))
}

pub async fn delete_brand(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Brands::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    record(state, user, "brand_delete", "brands", id).await;
    Ok(deleted("Brand deleted", id))
}

async fn record(state: &AppState, user: &AuthUser, action: &str, resource: &str, id: Uuid) {
    audit::record(
        &state.pool,
        Some(&user.subject),
        action,
        resource,
        serde_json::json!({ "id": id }),
    )
    .await;
}

fn deleted(message: &str, id: Uuid) -> ApiResponse<serde_json::Value> {
    ApiResponse::success(message, serde_json::json!({ "id": id }), Some(Meta::empty()))
}
