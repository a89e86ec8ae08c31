use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Program outcome, shared by every course of the program
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "program_outcomes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub program_id: Uuid,
    pub code: String,
    #[sea_orm(column_type = "Text")]
    pub statement: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::program::Entity",
        from = "Column::ProgramId",
        to = "super::program::Column::Id"
    )]
    Program,
    #[sea_orm(has_many = "super::clo_po_mapping::Entity")]
    Mappings,
}

impl Related<super::program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::clo_po_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mappings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
