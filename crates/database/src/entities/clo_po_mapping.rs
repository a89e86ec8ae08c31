use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clo_po_mappings")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub clo_id: Uuid,
    pub po_id: Uuid,
    /// 0 (none) to 3 (high)
    pub level: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clo::Entity",
        from = "Column::CloId",
        to = "super::clo::Column::Id"
    )]
    Clo,
    #[sea_orm(
        belongs_to = "super::po::Entity",
        from = "Column::PoId",
        to = "super::po::Column::Id"
    )]
    Po,
}

impl Related<super::clo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clo.def()
    }
}

impl Related<super::po::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Po.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
