use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "variation_attributes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub variation_id: Uuid,
    pub key: String,
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_variations::Entity",
        from = "Column::VariationId",
        to = "super::product_variations::Column::Id",
        on_delete = "Cascade"
    )]
    ProductVariations,
}

impl Related<super::product_variations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductVariations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
