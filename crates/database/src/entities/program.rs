use models::catalog::ProgramType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Programs form a tree: a level (UG, PG) is the parent of its degrees
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "programs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub code: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub program_type: ProgramType,
    pub level: Option<String>,
    pub parent_id: Option<Uuid>,
    pub duration: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::department::Entity")]
    Departments,
    #[sea_orm(has_many = "super::po::Entity")]
    Pos,
    #[sea_orm(has_many = "super::pso::Entity")]
    Psos,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::po::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pos.def()
    }
}

impl Related<super::pso::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Psos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
