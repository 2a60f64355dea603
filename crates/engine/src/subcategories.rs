//! Subcategories always hang off a category owned by the same user.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub user_id: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subcategories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Categories,
    #[sea_orm(has_many = "super::financials::Entity")]
    Financials,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::financials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Financials.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Subcategory {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category_id: model.category_id,
            user_id: model.user_id,
        }
    }
}
