use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assessments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    /// Faculty who created the assessment and owns its structure
    pub faculty_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub max_marks: f64,
    pub weightage: f64,
    pub assessment_type: String,
    pub mode: Option<String>,
    pub sub_type: Option<String>,
    pub semester: i32,
    pub year: i32,
    pub scheduled_date: Option<DateTimeUtc>,
    pub submission_deadline: Option<DateTimeUtc>,
    pub is_active: bool,
    pub is_marks_finalized: bool,
    pub marks_finalized_at: Option<DateTimeUtc>,
    pub marks_finalized_by_id: Option<Uuid>,
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
    #[sea_orm(
        belongs_to = "super::faculty::Entity",
        from = "Column::FacultyId",
        to = "super::faculty::Column::Id"
    )]
    Faculty,
    #[sea_orm(has_many = "super::assessment_clo::Entity")]
    AssessmentClos,
    #[sea_orm(has_many = "super::mark::Entity")]
    Marks,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::assessment_clo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentClos.def()
    }
}

impl Related<super::mark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
