use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub published: bool,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub product_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_delete = "SetNull"
    )]
    Products,
    #[sea_orm(has_many = "super::blog_post_tea_categories::Entity")]
    BlogPostTeaCategories,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::tea_categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::blog_post_tea_categories::Relation::TeaCategories.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::blog_post_tea_categories::Relation::BlogPosts.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
