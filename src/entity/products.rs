use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_delete = "SetNull"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::brands::Entity",
        from = "Column::BrandId",
        to = "super::brands::Column::Id",
        on_delete = "SetNull"
    )]
    Brands,
    #[sea_orm(
        belongs_to = "super::tea_categories::Entity",
        from = "Column::TeaCategoryId",
        to = "super::tea_categories::Column::Id",
        on_delete = "SetNull"
    )]
    TeaCategories,
    #[sea_orm(has_many = "super::product_variations::Entity")]
    ProductVariations,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brands.def()
    }
}

impl Related<super::tea_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeaCategories.def()
    }
}

impl Related<super::product_variations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductVariations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
