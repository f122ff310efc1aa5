use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    Name,
}

// Query strings are flat; `#[serde(flatten)]` would hand numbers to the
// inner struct as strings, so paging fields are repeated on each query.

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Brand slug.
    pub brand: Option<String>,
    /// Tea category slug.
    pub tea_category: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: Option<ProductSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BlogQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Tea category slug.
    pub tea_category: Option<String>,
}

impl BlogQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let p = Pagination::default();
        assert_eq!(p.normalize(), (1, 20, 0));
        let p = Pagination { page: Some(0), per_page: Some(500) };
        assert_eq!(p.normalize(), (1, 100, 0));
        let p = Pagination { page: Some(3), per_page: Some(10) };
        assert_eq!(p.normalize(), (3, 10, 20));
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let p = Pagination { page: Some(i64::MAX), per_page: Some(20) };
        let (page, per_page, offset) = p.normalize();
        assert_eq!((page, per_page), (i64::MAX, 20));
        assert_eq!(offset, i64::MAX);
        let p = Pagination { page: Some(i64::MIN), per_page: Some(i64::MAX) };
        assert_eq!(p.normalize(), (1, 100, 0));
    }

    #[test]
    fn product_query_reads_filters_and_sorting() {
        let q: ProductQuery =
            serde_json::from_value(serde_json::json!({
                "page": 2,
                "category": "green-tea",
                "sort_by": "price",
                "sort_order": "asc"
            }))
            .unwrap();
        assert_eq!(q.pagination().normalize(), (2, 20, 20));
        assert_eq!(q.category.as_deref(), Some("green-tea"));
        assert!(matches!(q.sort_by, Some(ProductSortBy::Price)));
        assert!(matches!(q.sort_order, Some(SortOrder::Asc)));
    }
}
