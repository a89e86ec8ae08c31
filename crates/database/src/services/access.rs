use crate::{
    entities::{assessment, course, course_faculty, department, faculty, user},
    error::ServiceError,
};
use log::debug;
use models::{role::Role, term::Term};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

/// The authenticated caller, resolved from the token subject.
///
/// Every capability check lives here so handlers never branch on roles
/// themselves. Checks are read-only.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: user::Model,
}

impl Principal {
    /// Loads the active user behind a token subject
    pub async fn resolve<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Self, ServiceError> {
        let user = user::Entity::find_by_id(user_id)
            .filter(user::Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or(ServiceError::Unauthenticated)?;

        Ok(Self { user })
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    /// The caller's active faculty profile.
    ///
    /// Every faculty-scoped operation starts here, before touching any
    /// target entity.
    pub async fn faculty_profile<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<faculty::Model, ServiceError> {
        faculty::Entity::find()
            .filter(faculty::Column::UserId.eq(self.user.id))
            .filter(faculty::Column::IsActive.eq(true))
            .one(db)
            .await?
            .ok_or(ServiceError::FacultyProfileNotFound)
    }

    /// Whether the caller may manage the given department's catalog
    pub fn can_manage_department(&self, department: &department::Model) -> bool {
        self.is_admin()
            || (self.user.role == Role::Hod && department.hod_id == Some(self.user.id))
    }

    pub async fn require_department_manager<C: ConnectionTrait>(
        &self,
        db: &C,
        department_id: Uuid,
    ) -> Result<department::Model, ServiceError> {
        let department = department::Entity::find_by_id(department_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", department_id))?;

        if !self.can_manage_department(&department) {
            debug!(
                "User {} denied management of department {}",
                self.user.id, department.id
            );
            return Err(ServiceError::forbidden(
                "You are not the HOD of this department",
            ));
        }

        Ok(department)
    }

    /// The department this caller heads
    pub async fn headed_department<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<department::Model, ServiceError> {
        if !self.role().manages_departments() {
            return Err(ServiceError::forbidden("Only a HOD may perform this action"));
        }

        let mut query = department::Entity::find();
        query = match self.user.department_id {
            Some(department_id) if self.is_admin() => {
                query.filter(department::Column::Id.eq(department_id))
            }
            _ => query.filter(department::Column::HodId.eq(self.user.id)),
        };

        query
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::forbidden("You are not the HOD of any department"))
    }

    /// Resolves a course and checks the caller heads its department
    pub async fn require_course_hod<C: ConnectionTrait>(
        &self,
        db: &C,
        course_id: Uuid,
    ) -> Result<course::Model, ServiceError> {
        let course = course::Entity::find_by_id(course_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Course", course_id))?;

        self.require_department_manager(db, course.department_id)
            .await?;

        Ok(course)
    }

    /// Resolves a faculty member and checks the caller heads their department
    pub async fn require_faculty_hod<C: ConnectionTrait>(
        &self,
        db: &C,
        faculty_id: Uuid,
    ) -> Result<faculty::Model, ServiceError> {
        let faculty = faculty::Entity::find_by_id(faculty_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Faculty", faculty_id))?;

        self.require_department_manager(db, faculty.department_id)
            .await?;

        Ok(faculty)
    }
}

/// Finds the faculty's assignment to a course, optionally for one term
pub async fn find_assignment<C: ConnectionTrait>(
    db: &C,
    faculty_id: Uuid,
    course_id: Uuid,
    term: Option<Term>,
) -> Result<Option<course_faculty::Model>, ServiceError> {
    let mut query = course_faculty::Entity::find()
        .filter(course_faculty::Column::FacultyId.eq(faculty_id))
        .filter(course_faculty::Column::CourseId.eq(course_id));

    if let Some(term) = term {
        query = query
            .filter(course_faculty::Column::Semester.eq(term.semester))
            .filter(course_faculty::Column::Year.eq(term.year));
    }

    Ok(query.one(db).await?)
}

/// Requires the faculty to teach the course (in the given term, if any)
pub async fn require_assignment<C: ConnectionTrait>(
    db: &C,
    faculty_id: Uuid,
    course_id: Uuid,
    term: Option<Term>,
) -> Result<course_faculty::Model, ServiceError> {
    find_assignment(db, faculty_id, course_id, term)
        .await?
        .ok_or(ServiceError::NotAssigned { course_id, term })
}

/// Only the creator may change an assessment's structure or lock state
pub fn can_manage_assessment(faculty: &faculty::Model, assessment: &assessment::Model) -> bool {
    assessment.faculty_id == faculty.id
}

pub fn require_assessment_owner(
    faculty: &faculty::Model,
    assessment: &assessment::Model,
    action: &str,
) -> Result<(), ServiceError> {
    if can_manage_assessment(faculty, assessment) {
        Ok(())
    } else {
        Err(ServiceError::forbidden(format!(
            "You do not have permission to {action} this assessment"
        )))
    }
}

/// Whether the faculty may read (and enter marks for) an assessment: its
/// creator, or anyone assigned to its course in the assessment's term
pub async fn can_view_assessment<C: ConnectionTrait>(
    db: &C,
    faculty: &faculty::Model,
    assessment: &assessment::Model,
) -> Result<bool, ServiceError> {
    if can_manage_assessment(faculty, assessment) {
        return Ok(true);
    }

    let term = Term::new(assessment.semester, assessment.year);
    Ok(find_assignment(db, faculty.id, assessment.course_id, Some(term))
        .await?
        .is_some())
}

pub async fn require_assessment_reader<C: ConnectionTrait>(
    db: &C,
    faculty: &faculty::Model,
    assessment: &assessment::Model,
) -> Result<(), ServiceError> {
    if can_view_assessment(db, faculty, assessment).await? {
        Ok(())
    } else {
        Err(ServiceError::forbidden(
            "You do not have permission to view this assessment",
        ))
    }
}

/// Loads an active assessment
pub async fn find_active_assessment<C: ConnectionTrait>(
    db: &C,
    assessment_id: Uuid,
) -> Result<assessment::Model, ServiceError> {
    assessment::Entity::find_by_id(assessment_id)
        .filter(assessment::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Assessment", assessment_id))
}
