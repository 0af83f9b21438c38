use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::{category_mapping, property};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub account_name: String,
    pub account_type: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    CategoryMapping,
    Property,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::CategoryMapping => Entity::has_many(category_mapping::Entity).into(),
            Self::Property => Entity::has_many(property::Entity).into(),
        }
    }
}

impl Related<category_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryMapping.def()
    }
}

impl Related<property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
