use models::catalog::{CourseCategory, CourseType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub semester: i32,
    /// Drives the marks cap: each credit is worth 25 assessment marks
    pub credits: i32,
    pub course_type: CourseType,
    pub category: Option<CourseCategory>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub department_id: Uuid,
    pub created_by_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(has_many = "super::clo::Entity")]
    Clos,
    #[sea_orm(has_many = "super::assessment::Entity")]
    Assessments,
    #[sea_orm(has_many = "super::course_faculty::Entity")]
    CourseFaculties,
    #[sea_orm(has_many = "super::student_course_enrollment::Entity")]
    Enrollments,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::clo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clos.def()
    }
}

impl Related<super::assessment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessments.def()
    }
}

impl Related<super::course_faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseFaculties.def()
    }
}

impl Related<super::student_course_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
