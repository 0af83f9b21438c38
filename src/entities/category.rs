use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::category_mapping;

/// A category is scoped to one account; the same name may exist in several
/// accounts as distinct rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_name: String,
    pub account_type: String,
    pub name: String,
    pub color: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CategoryMapping,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::CategoryMapping => Entity::has_many(category_mapping::Entity).into(),
        }
    }
}

impl Related<category_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryMapping.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
