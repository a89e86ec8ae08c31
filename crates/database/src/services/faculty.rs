use crate::{
    entities::{course, course_faculty, department, faculty},
    error::ServiceError,
    services::{access::Principal, allocation::active_clos},
};
use futures::future::try_join_all;
use models::{catalog::CourseType, term::Term};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingCourse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub semester: i32,
    pub course_type: CourseType,
    pub description: Option<String>,
}

impl From<course::Model> for TeachingCourse {
    fn from(course: course::Model) -> Self {
        Self {
            id: course.id,
            code: course.code,
            name: course.name,
            credits: course.credits,
            semester: course.semester,
            course_type: course.course_type,
            description: course.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingAssignment {
    #[serde(flatten)]
    pub assignment: course_faculty::Model,
    pub course: Option<TeachingCourse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloOutline {
    pub code: String,
    pub statement: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAssignment {
    #[serde(flatten)]
    pub assignment: TeachingAssignment,
    pub clos: Vec<CloOutline>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyProfile {
    #[serde(flatten)]
    pub faculty: faculty::Model,
    pub email: String,
    pub department: Option<department::Model>,
    pub assignments: Vec<TeachingAssignment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAssignments {
    pub name: String,
    pub designation: Option<String>,
    pub current_year: i32,
    pub current_semester: i32,
    pub assignments: Vec<CurrentAssignment>,
}

/// Read-only views for the signed-in faculty member
pub struct FacultyService;

impl FacultyService {
    pub async fn profile(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<FacultyProfile, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let department = department::Entity::find_by_id(faculty.department_id)
            .one(db)
            .await?;
        let assignments = teaching_assignments(db, faculty.id, None).await?;

        Ok(FacultyProfile {
            email: principal.user.email.clone(),
            faculty,
            department,
            assignments,
        })
    }

    /// Assignments for the term containing today
    pub async fn current_assignments(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<CurrentAssignments, ServiceError> {
        Self::assignments_for(db, principal, Term::current()).await
    }

    pub async fn assignments_for(
        db: &DatabaseConnection,
        principal: &Principal,
        term: Term,
    ) -> Result<CurrentAssignments, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;

        let teaching = teaching_assignments(db, faculty.id, Some(term)).await?;
        let clos = try_join_all(
            teaching
                .iter()
                .map(|t| active_clos(db, t.assignment.course_id, None)),
        )
        .await?;

        let assignments = teaching
            .into_iter()
            .zip(clos)
            .map(|(assignment, clos)| CurrentAssignment {
                assignment,
                clos: clos
                    .into_iter()
                    .map(|clo| CloOutline {
                        code: clo.code,
                        statement: clo.statement,
                    })
                    .collect(),
            })
            .collect();

        Ok(CurrentAssignments {
            name: faculty.name,
            designation: faculty.designation,
            current_year: term.year,
            current_semester: term.semester,
            assignments,
        })
    }

    pub async fn all_assignments(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<Vec<TeachingAssignment>, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        teaching_assignments(db, faculty.id, None).await
    }
}

/// Newest year first, semesters ascending
async fn teaching_assignments<C: ConnectionTrait>(
    db: &C,
    faculty_id: Uuid,
    term: Option<Term>,
) -> Result<Vec<TeachingAssignment>, ServiceError> {
    let mut query =
        course_faculty::Entity::find().filter(course_faculty::Column::FacultyId.eq(faculty_id));
    if let Some(term) = term {
        query = query
            .filter(course_faculty::Column::Semester.eq(term.semester))
            .filter(course_faculty::Column::Year.eq(term.year));
    }

    Ok(query
        .find_also_related(course::Entity)
        .order_by_desc(course_faculty::Column::Year)
        .order_by_asc(course_faculty::Column::Semester)
        .all(db)
        .await?
        .into_iter()
        .map(|(assignment, course)| TeachingAssignment {
            assignment,
            course: course.map(TeachingCourse::from),
        })
        .collect())
}
