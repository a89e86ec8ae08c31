use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Share of an assessment's max marks allocated to one CLO
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessment_clos")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub assessment_id: Uuid,
    pub clo_id: Uuid,
    pub marks_allocated: f64,
    pub weightage: f64,
    pub bloom_level: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assessment::Entity",
        from = "Column::AssessmentId",
        to = "super::assessment::Column::Id"
    )]
    Assessment,
    #[sea_orm(
        belongs_to = "super::clo::Entity",
        from = "Column::CloId",
        to = "super::clo::Column::Id"
    )]
    Clo,
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessment.def()
    }
}

impl Related<super::clo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
