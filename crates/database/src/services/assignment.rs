use crate::{
    entities::{course, course_faculty, faculty, user},
    error::ServiceError,
    services::{
        access::{Principal, find_assignment},
        assessment::{CourseBrief, FacultyBrief, validate_term},
    },
};
use chrono::Utc;
use log::{debug, info};
use models::{role::Role, term::Term};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub faculty_id: Uuid,
    pub semester: i32,
    pub year: i32,
    pub teaching_methodology: Option<String>,
    pub assessment_mode: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub teaching_methodology: Option<String>,
    pub assessment_mode: Option<String>,
    /// Moves the assignment to another faculty; HOD only
    pub new_faculty_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedCourse {
    pub course_id: Uuid,
    pub code: String,
    pub name: String,
    pub semester: i32,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFaculty {
    #[serde(flatten)]
    pub faculty: faculty::Model,
    pub email: Option<String>,
    pub assignments: Vec<AssignedCourse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyContact {
    #[serde(flatten)]
    pub faculty: faculty::Model,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableFaculties {
    pub course: CourseBrief,
    pub faculties: Vec<FacultyContact>,
    pub current_semester: Option<i32>,
    pub current_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: course_faculty::Model,
    pub faculty: Option<FacultyBrief>,
    pub faculty_email: Option<String>,
    pub course: Option<CourseBrief>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignments {
    pub course: CourseBrief,
    pub assignments: Vec<AssignmentView>,
}

/// Who teaches which course in which term
pub struct AssignmentService;

impl AssignmentService {
    /// Active faculty of the caller's department with their assignments
    pub async fn department_faculties(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<Vec<DepartmentFaculty>, ServiceError> {
        let department = principal.headed_department(db).await?;

        let faculties = faculty::Entity::find()
            .filter(faculty::Column::DepartmentId.eq(department.id))
            .filter(faculty::Column::IsActive.eq(true))
            .order_by_asc(faculty::Column::Name)
            .all(db)
            .await?;
        let faculty_ids: Vec<Uuid> = faculties.iter().map(|f| f.id).collect();
        let emails = emails_of(db, &faculties).await?;

        let mut assigned: HashMap<Uuid, Vec<AssignedCourse>> = HashMap::new();
        if !faculty_ids.is_empty() {
            for (assignment, course) in course_faculty::Entity::find()
                .filter(course_faculty::Column::FacultyId.is_in(faculty_ids))
                .find_also_related(course::Entity)
                .order_by_desc(course_faculty::Column::Year)
                .order_by_asc(course_faculty::Column::Semester)
                .all(db)
                .await?
            {
                let Some(course) = course else { continue };
                assigned
                    .entry(assignment.faculty_id)
                    .or_default()
                    .push(AssignedCourse {
                        course_id: course.id,
                        code: course.code,
                        name: course.name,
                        semester: assignment.semester,
                        year: assignment.year,
                    });
            }
        }

        Ok(faculties
            .into_iter()
            .map(|faculty| DepartmentFaculty {
                email: emails.get(&faculty.user_id).cloned(),
                assignments: assigned.remove(&faculty.id).unwrap_or_default(),
                faculty,
            })
            .collect())
    }

    /// Department faculty not yet assigned to the course for the term
    pub async fn available_faculties(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        term: Option<Term>,
    ) -> Result<AvailableFaculties, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        let mut faculties = faculty::Entity::find()
            .filter(faculty::Column::DepartmentId.eq(course.department_id))
            .filter(faculty::Column::IsActive.eq(true))
            .order_by_asc(faculty::Column::Name)
            .all(db)
            .await?;

        if let Some(term) = term {
            let assigned: HashSet<Uuid> = course_faculty::Entity::find()
                .filter(course_faculty::Column::CourseId.eq(course.id))
                .filter(course_faculty::Column::Semester.eq(term.semester))
                .filter(course_faculty::Column::Year.eq(term.year))
                .all(db)
                .await?
                .into_iter()
                .map(|a| a.faculty_id)
                .collect();
            faculties.retain(|f| !assigned.contains(&f.id));
        }

        let emails = emails_of(db, &faculties).await?;

        Ok(AvailableFaculties {
            course: CourseBrief::from(&course),
            faculties: faculties
                .into_iter()
                .map(|faculty| FacultyContact {
                    email: emails.get(&faculty.user_id).cloned(),
                    faculty,
                })
                .collect(),
            current_semester: term.map(|t| t.semester),
            current_year: term.map(|t| t.year),
        })
    }

    /// Assigns a faculty member of the course's department to teach it
    pub async fn assign(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        input: NewAssignment,
    ) -> Result<AssignmentView, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;
        let term = Term::new(input.semester, input.year);
        validate_term(term)?;

        let faculty = department_faculty(db, input.faculty_id, course.department_id).await?;

        if find_assignment(db, faculty.id, course.id, Some(term))
            .await?
            .is_some()
        {
            return Err(ServiceError::UniqueConstraintViolation(
                "Faculty is already assigned to this course for the given semester and year".into(),
            ));
        }

        let now = Utc::now();
        let assignment = course_faculty::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            faculty_id: Set(faculty.id),
            semester: Set(term.semester),
            year: Set(term.year),
            teaching_methodology: Set(input.teaching_methodology),
            assessment_mode: Set(input.assessment_mode),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from(e).on_conflict("Duplicate assignment detected"))?;

        info!(
            "User {} assigned faculty {} to course {} for {term}",
            principal.user_id(),
            faculty.id,
            course.code
        );

        view(db, assignment, Some(&faculty), Some(&course)).await
    }

    /// Assignments of a course, optionally narrowed to a term
    pub async fn list_for_course(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        semester: Option<i32>,
        year: Option<i32>,
    ) -> Result<CourseAssignments, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        let mut query =
            course_faculty::Entity::find().filter(course_faculty::Column::CourseId.eq(course.id));
        if let Some(semester) = semester {
            query = query.filter(course_faculty::Column::Semester.eq(semester));
        }
        if let Some(year) = year {
            query = query.filter(course_faculty::Column::Year.eq(year));
        }

        let rows = query
            .find_also_related(faculty::Entity)
            .order_by_desc(course_faculty::Column::Year)
            .order_by_asc(course_faculty::Column::Semester)
            .order_by_desc(course_faculty::Column::CreatedAt)
            .all(db)
            .await?;

        let faculties: Vec<faculty::Model> = rows.iter().filter_map(|(_, f)| f.clone()).collect();
        let emails = emails_of(db, &faculties).await?;
        let brief = CourseBrief::from(&course);

        Ok(CourseAssignments {
            assignments: rows
                .into_iter()
                .map(|(assignment, faculty)| AssignmentView {
                    faculty_email: faculty
                        .as_ref()
                        .and_then(|f| emails.get(&f.user_id).cloned()),
                    faculty: faculty.as_ref().map(FacultyBrief::from),
                    course: Some(brief.clone()),
                    assignment,
                })
                .collect(),
            course: brief,
        })
    }

    /// Updates an assignment.
    ///
    /// Faculty may edit the methodology and mode of their own assignment.
    /// A HOD may also move the assignment to another faculty member.
    pub async fn update(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        faculty_id: Uuid,
        term: Term,
        update: AssignmentUpdate,
    ) -> Result<AssignmentView, ServiceError> {
        let existing = find_assignment(db, faculty_id, course_id, Some(term))
            .await?
            .ok_or_else(|| ServiceError::not_found("Assignment", course_id))?;

        match principal.role() {
            Role::Faculty => {
                let own = principal.faculty_profile(db).await?;
                if own.id != faculty_id {
                    return Err(ServiceError::forbidden(
                        "You can only update your own assignments",
                    ));
                }
                if update.new_faculty_id.is_some_and(|id| id != faculty_id) {
                    return Err(ServiceError::forbidden("Only a HOD may reassign a course"));
                }
                let updated = update_details(db, existing, update).await?;
                info!("Faculty {} updated their assignment {}", own.id, updated.id);
                view(db, updated, Some(&own), None).await
            }
            Role::Hod | Role::Admin => {
                let course = principal.require_course_hod(db, course_id).await?;

                match update.new_faculty_id.filter(|id| *id != faculty_id) {
                    Some(new_faculty_id) => {
                        Self::reassign(db, principal, &course, existing, new_faculty_id, update)
                            .await
                    }
                    None => {
                        let updated = update_details(db, existing, update).await?;
                        info!(
                            "User {} updated assignment {}",
                            principal.user_id(),
                            updated.id
                        );
                        view(db, updated, None, Some(&course)).await
                    }
                }
            }
            Role::Student => Err(ServiceError::forbidden("Unauthorized role")),
        }
    }

    /// Removes an assignment
    pub async fn remove(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        faculty_id: Uuid,
        term: Term,
    ) -> Result<(), ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        let result = course_faculty::Entity::delete_many()
            .filter(course_faculty::Column::CourseId.eq(course.id))
            .filter(course_faculty::Column::FacultyId.eq(faculty_id))
            .filter(course_faculty::Column::Semester.eq(term.semester))
            .filter(course_faculty::Column::Year.eq(term.year))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found("Assignment", course_id));
        }

        info!(
            "User {} removed faculty {faculty_id} from course {} for {term}",
            principal.user_id(),
            course.code
        );
        Ok(())
    }

    /// Deletes the old assignment and creates the new one in one transaction
    async fn reassign(
        db: &DatabaseConnection,
        principal: &Principal,
        course: &course::Model,
        existing: course_faculty::Model,
        new_faculty_id: Uuid,
        update: AssignmentUpdate,
    ) -> Result<AssignmentView, ServiceError> {
        let new_faculty = department_faculty(db, new_faculty_id, course.department_id).await?;
        let term = Term::new(existing.semester, existing.year);

        if find_assignment(db, new_faculty.id, course.id, Some(term))
            .await?
            .is_some()
        {
            return Err(ServiceError::UniqueConstraintViolation(
                "New faculty is already assigned to this course for the given semester and year"
                    .into(),
            ));
        }

        let txn = db.begin().await?;

        course_faculty::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        let now = Utc::now();
        let assignment = course_faculty::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            faculty_id: Set(new_faculty.id),
            semester: Set(existing.semester),
            year: Set(existing.year),
            teaching_methodology: Set(update
                .teaching_methodology
                .or(existing.teaching_methodology)),
            assessment_mode: Set(update.assessment_mode.or(existing.assessment_mode)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "User {} reassigned course {} for {term} from faculty {} to {}",
            principal.user_id(),
            course.code,
            existing.faculty_id,
            new_faculty.id
        );

        view(db, assignment, Some(&new_faculty), Some(course)).await
    }
}

/// Active faculty member of the given department
async fn department_faculty<C: ConnectionTrait>(
    db: &C,
    faculty_id: Uuid,
    department_id: Uuid,
) -> Result<faculty::Model, ServiceError> {
    let faculty = faculty::Entity::find_by_id(faculty_id)
        .filter(faculty::Column::IsActive.eq(true))
        .one(db)
        .await?;

    match faculty {
        Some(faculty) if faculty.department_id == department_id => Ok(faculty),
        Some(_) => {
            debug!("Faculty {faculty_id} is outside department {department_id}");
            Err(ServiceError::validation(
                "Faculty does not belong to the course's department",
            ))
        }
        None => Err(ServiceError::not_found("Faculty", faculty_id)),
    }
}

async fn update_details<C: ConnectionTrait>(
    db: &C,
    existing: course_faculty::Model,
    update: AssignmentUpdate,
) -> Result<course_faculty::Model, ServiceError> {
    let mut active: course_faculty::ActiveModel = existing.into();
    if let Some(methodology) = update.teaching_methodology {
        active.teaching_methodology = Set(Some(methodology));
    }
    if let Some(mode) = update.assessment_mode {
        active.assessment_mode = Set(Some(mode));
    }
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Login emails keyed by user id
async fn emails_of<C: ConnectionTrait>(
    db: &C,
    faculties: &[faculty::Model],
) -> Result<HashMap<Uuid, String>, ServiceError> {
    let user_ids: Vec<Uuid> = faculties.iter().map(|f| f.user_id).collect();
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect())
}

async fn view<C: ConnectionTrait>(
    db: &C,
    assignment: course_faculty::Model,
    faculty: Option<&faculty::Model>,
    course: Option<&course::Model>,
) -> Result<AssignmentView, ServiceError> {
    let faculty = match faculty {
        Some(faculty) => Some(faculty.clone()),
        None => faculty::Entity::find_by_id(assignment.faculty_id)
            .one(db)
            .await?,
    };
    let course = match course {
        Some(course) => Some(course.clone()),
        None => course::Entity::find_by_id(assignment.course_id)
            .one(db)
            .await?,
    };
    let faculty_email = match &faculty {
        Some(faculty) => user::Entity::find_by_id(faculty.user_id)
            .one(db)
            .await?
            .map(|u| u.email),
        None => None,
    };

    Ok(AssignmentView {
        faculty: faculty.as_ref().map(FacultyBrief::from),
        faculty_email,
        course: course.as_ref().map(CourseBrief::from),
        assignment,
    })
}
