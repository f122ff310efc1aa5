use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    slug::{slugify, unique_slug},
};

pub mod admin_service;
pub mod blog_service;
pub mod cart_service;
pub mod catalog_service;
pub mod order_service;
pub mod product_service;
pub mod stock_service;
pub mod taxonomy_service;

/// Pick the slug for a new or renamed record.
///
/// An explicit slug must be free; a slug derived from `source` gets a
/// numeric suffix until it is.
pub(crate) async fn resolve_slug<E, C>(
    conn: &C,
    slug_col: E::Column,
    id_col: E::Column,
    requested: Option<&str>,
    source: &str,
    current_id: Option<Uuid>,
) -> AppResult<String>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let explicit = requested.map(str::trim).filter(|s| !s.is_empty());
    let base = slugify(explicit.unwrap_or(source));
    if base.is_empty() {
        return Err(AppError::BadRequest(
            "slug must contain at least one letter or digit".into(),
        ));
    }

    let mut finder = E::find()
        .select_only()
        .column(slug_col)
        .filter(slug_col.starts_with(base.as_str()));
    if let Some(id) = current_id {
        finder = finder.filter(id_col.ne(id));
    }
    let taken: Vec<String> = finder.into_tuple::<String>().all(conn).await?;

    if explicit.is_some() {
        if taken.iter().any(|s| *s == base) {
            return Err(AppError::Conflict(format!("slug '{base}' is already in use")));
        }
        return Ok(base);
    }
    Ok(unique_slug(&base, |candidate| {
        taken.iter().any(|s| s == candidate)
    }))
}

pub(crate) fn require_text(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn check_discount(discount: Option<i32>) -> AppResult<()> {
    match discount {
        Some(d) if !(0..=100).contains(&d) => Err(AppError::BadRequest(
            "discount must be between 0 and 100".into(),
        )),
        _ => Ok(()),
    }
}
