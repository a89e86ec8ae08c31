use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Marks a student obtained for one CLO of one assessment
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "marks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub assessment_id: Uuid,
    pub clo_id: Uuid,
    pub marks_obtained: f64,
    pub entered_by_id: Option<Uuid>,
    pub entered_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
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

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
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
