use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_post_tea_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub blog_post_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tea_category_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blog_posts::Entity",
        from = "Column::BlogPostId",
        to = "super::blog_posts::Column::Id",
        on_delete = "Cascade"
    )]
    BlogPosts,
    #[sea_orm(
        belongs_to = "super::tea_categories::Entity",
        from = "Column::TeaCategoryId",
        to = "super::tea_categories::Column::Id",
        on_delete = "Cascade"
    )]
    TeaCategories,
}

impl Related<super::blog_posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPosts.def()
    }
}

impl Related<super::tea_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeaCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
