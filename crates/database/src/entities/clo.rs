use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course learning outcome
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clos")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub code: String,
    #[sea_orm(column_type = "Text")]
    pub statement: String,
    pub bloom_level: String,
    /// Percentage a student must reach for the outcome to count as attained
    pub attainment_threshold: f64,
    pub display_order: i32,
    pub version: i32,
    pub is_active: bool,
    pub created_by_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::clo_po_mapping::Entity")]
    PoMappings,
    #[sea_orm(has_many = "super::clo_pso_mapping::Entity")]
    PsoMappings,
    #[sea_orm(has_many = "super::assessment_clo::Entity")]
    AssessmentClos,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::clo_po_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PoMappings.def()
    }
}

impl Related<super::clo_pso_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PsoMappings.def()
    }
}

impl Related<super::assessment_clo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentClos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
