use crate::{
    entities::{
        assessment, assessment_clo, clo, clo_po_mapping, clo_pso_mapping, course, course_faculty,
        department, faculty, mark, program, student_course_enrollment,
    },
    error::ServiceError,
    services::{access::Principal, allocation::active_clos, assessment::FacultyBrief},
};
use chrono::Utc;
use log::{info, warn};
use models::{
    catalog::{CourseCategory, CourseType},
    outcome::valid_attainment_threshold,
    slug::{make_slug, next_course_code},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Serialize;
use std::{collections::HashMap, str::FromStr};
use uuid::Uuid;

/// Default percentage a student must reach for a CLO to count as attained
const DEFAULT_ATTAINMENT_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub slug: Option<String>,
    pub semester: Option<i32>,
    pub credits: i32,
    pub course_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub semester: Option<i32>,
    pub credits: Option<i32>,
    pub course_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClo {
    pub code: String,
    pub statement: String,
    pub bloom_level: String,
    pub attainment_threshold: Option<f64>,
    pub display_order: Option<i32>,
    pub version: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct CloPatch {
    pub code: Option<String>,
    pub statement: Option<String>,
    pub bloom_level: Option<String>,
    pub attainment_threshold: Option<f64>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramBrief {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&program::Model> for ProgramBrief {
    fn from(program: &program::Model) -> Self {
        Self {
            id: program.id,
            name: program.name.clone(),
            slug: program.slug.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListing {
    #[serde(flatten)]
    pub course: course::Model,
    pub department_name: String,
    pub program: Option<ProgramBrief>,
    pub active_clos: u64,
    pub faculties: Vec<FacultyBrief>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: course::Model,
    pub department: department::Model,
    pub program: Option<program::Model>,
    pub clos: Vec<clo::Model>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRemoval {
    pub course_id: Uuid,
    pub clos_deleted: u64,
    pub assessments_deleted: u64,
    pub assignments_deleted: u64,
    pub enrollments_deleted: u64,
}

/// Catalog maintenance for heads of department
pub struct CourseService;

impl CourseService {
    /// Programmes the caller belongs to, by department membership or as HOD
    pub async fn programmes(
        db: &DatabaseConnection,
        principal: &Principal,
    ) -> Result<Vec<program::Model>, ServiceError> {
        let departments = visible_departments(db, principal).await?;
        let program_ids: Vec<Uuid> = departments.iter().map(|d| d.program_id).collect();
        if program_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(program::Entity::find()
            .filter(program::Column::Id.is_in(program_ids))
            .order_by_asc(program::Column::Name)
            .all(db)
            .await?)
    }

    /// Next free course code for a programme
    pub async fn auto_code(
        db: &DatabaseConnection,
        principal: &Principal,
        program_id: Uuid,
    ) -> Result<String, ServiceError> {
        principal.headed_department(db).await?;

        let department_ids: Vec<Uuid> = department::Entity::find()
            .filter(department::Column::ProgramId.eq(program_id))
            .all(db)
            .await?
            .into_iter()
            .map(|d| d.id)
            .collect();

        let last = if department_ids.is_empty() {
            None
        } else {
            course::Entity::find()
                .filter(course::Column::DepartmentId.is_in(department_ids))
                .order_by_desc(course::Column::CreatedAt)
                .one(db)
                .await?
        };

        Ok(next_course_code(last.as_ref().map(|c| c.code.as_str())))
    }

    /// Courses of the departments the caller heads, optionally for one programme
    pub async fn list(
        db: &DatabaseConnection,
        principal: &Principal,
        program_id: Option<Uuid>,
    ) -> Result<Vec<CourseListing>, ServiceError> {
        if !principal.role().manages_departments() {
            return Err(ServiceError::forbidden("Only a HOD may list department courses"));
        }

        let mut departments = visible_departments(db, principal).await?;
        if departments.is_empty() {
            return Err(ServiceError::forbidden("You are not the HOD of any department"));
        }
        if let Some(program_id) = program_id {
            departments.retain(|d| d.program_id == program_id);
        }
        if departments.is_empty() {
            return Ok(Vec::new());
        }

        let programs: HashMap<Uuid, program::Model> = program::Entity::find()
            .filter(
                program::Column::Id.is_in(departments.iter().map(|d| d.program_id).collect::<Vec<_>>()),
            )
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let departments: HashMap<Uuid, department::Model> =
            departments.into_iter().map(|d| (d.id, d)).collect();

        let courses = course::Entity::find()
            .filter(course::Column::DepartmentId.is_in(departments.keys().copied().collect::<Vec<_>>()))
            .order_by_asc(course::Column::Semester)
            .order_by_desc(course::Column::CreatedAt)
            .all(db)
            .await?;
        let course_ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();

        let mut clo_counts: HashMap<Uuid, u64> = HashMap::new();
        for clo in clo::Entity::find()
            .filter(clo::Column::CourseId.is_in(course_ids.clone()))
            .filter(clo::Column::IsActive.eq(true))
            .all(db)
            .await?
        {
            *clo_counts.entry(clo.course_id).or_default() += 1;
        }

        let mut faculties: HashMap<Uuid, Vec<FacultyBrief>> = HashMap::new();
        for (assignment, faculty) in course_faculty::Entity::find()
            .filter(course_faculty::Column::CourseId.is_in(course_ids))
            .find_also_related(faculty::Entity)
            .all(db)
            .await?
        {
            let Some(faculty) = faculty else { continue };
            let briefs = faculties.entry(assignment.course_id).or_default();
            if !briefs.iter().any(|b| b.id == faculty.id) {
                briefs.push(FacultyBrief::from(&faculty));
            }
        }

        Ok(courses
            .into_iter()
            .map(|course| {
                let department = departments.get(&course.department_id);
                CourseListing {
                    department_name: department.map(|d| d.name.clone()).unwrap_or_default(),
                    program: department
                        .and_then(|d| programs.get(&d.program_id))
                        .map(ProgramBrief::from),
                    active_clos: clo_counts.get(&course.id).copied().unwrap_or(0),
                    faculties: faculties.remove(&course.id).unwrap_or_default(),
                    course,
                }
            })
            .collect())
    }

    /// Creates a course in the department the caller heads
    pub async fn create(
        db: &DatabaseConnection,
        principal: &Principal,
        input: NewCourse,
    ) -> Result<course::Model, ServiceError> {
        let department = principal.headed_department(db).await?;

        if input.code.trim().is_empty() || input.name.trim().is_empty() {
            return Err(ServiceError::validation("code and name are required"));
        }
        validate_credits(input.credits)?;
        let course_type = parse_course_type(input.course_type.as_deref())?.unwrap_or(CourseType::Theory);
        let category = parse_category(input.category.as_deref())?;
        let slug = match input.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => make_slug(slug),
            _ => make_slug(&input.name),
        };

        let now = Utc::now();
        let course = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code.trim().to_string()),
            name: Set(input.name.trim().to_string()),
            slug: Set(slug),
            semester: Set(input.semester.unwrap_or(0)),
            credits: Set(input.credits),
            course_type: Set(course_type),
            category: Set(category),
            description: Set(input.description),
            department_id: Set(department.id),
            created_by_id: Set(Some(principal.user_id())),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| {
            ServiceError::from(e).on_conflict("A course with that slug already exists")
        })?;

        info!(
            "User {} created course {} in department {}",
            principal.user_id(),
            course.code,
            department.code
        );
        Ok(course)
    }

    pub async fn update(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        patch: CoursePatch,
    ) -> Result<course::Model, ServiceError> {
        let current = principal.require_course_hod(db, course_id).await?;

        if let Some(credits) = patch.credits {
            validate_credits(credits)?;
        }
        let course_type = parse_course_type(patch.course_type.as_deref())?;
        let category = parse_category(patch.category.as_deref())?;

        let mut active: course::ActiveModel = current.into();
        if let Some(code) = patch.code.filter(|c| !c.trim().is_empty()) {
            active.code = Set(code.trim().to_string());
        }
        let renamed = patch.name.filter(|n| !n.trim().is_empty());
        match (patch.slug.as_deref().map(str::trim), &renamed) {
            (Some(slug), _) if !slug.is_empty() => active.slug = Set(make_slug(slug)),
            (Some(_), Some(name)) => active.slug = Set(make_slug(name)),
            _ => {}
        }
        if let Some(name) = renamed {
            active.name = Set(name.trim().to_string());
        }
        if let Some(semester) = patch.semester {
            active.semester = Set(semester);
        }
        if let Some(credits) = patch.credits {
            active.credits = Set(credits);
        }
        if let Some(course_type) = course_type {
            active.course_type = Set(course_type);
        }
        if let Some(category) = category {
            active.category = Set(Some(category));
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let course = active.update(db).await.map_err(|e| {
            ServiceError::from(e).on_conflict("A course with that slug already exists")
        })?;

        info!("User {} updated course {}", principal.user_id(), course.code);
        Ok(course)
    }

    pub async fn get(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
    ) -> Result<CourseDetail, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;
        let department = department::Entity::find_by_id(course.department_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Department", course.department_id))?;
        let program = program::Entity::find_by_id(department.program_id)
            .one(db)
            .await?;

        Ok(CourseDetail {
            clos: active_clos(db, course.id, None).await?,
            course,
            department,
            program,
        })
    }

    /// Hard-deletes a course and everything it owns.
    ///
    /// Marks are never cascaded; a course with any marks is rejected.
    pub async fn delete(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
    ) -> Result<CourseRemoval, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;
        let txn = db.begin().await?;

        let assessment_ids: Vec<Uuid> = assessment::Entity::find()
            .filter(assessment::Column::CourseId.eq(course.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect();
        let clo_ids: Vec<Uuid> = clo::Entity::find()
            .filter(clo::Column::CourseId.eq(course.id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();

        let marks_count = mark::Entity::find()
            .filter(
                Condition::any()
                    .add(mark::Column::AssessmentId.is_in(assessment_ids.clone()))
                    .add(mark::Column::CloId.is_in(clo_ids.clone())),
            )
            .count(&txn)
            .await?;
        if marks_count > 0 {
            warn!(
                "Refusing to delete course {} with {marks_count} recorded mark(s)",
                course.code
            );
            return Err(ServiceError::LockedByMarks {
                message: "Cannot delete a course after marks have been entered".into(),
                marks_count,
                disallowed_fields: Vec::new(),
            });
        }

        clo_po_mapping::Entity::delete_many()
            .filter(clo_po_mapping::Column::CloId.is_in(clo_ids.clone()))
            .exec(&txn)
            .await?;
        clo_pso_mapping::Entity::delete_many()
            .filter(clo_pso_mapping::Column::CloId.is_in(clo_ids.clone()))
            .exec(&txn)
            .await?;
        assessment_clo::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(assessment_clo::Column::AssessmentId.is_in(assessment_ids))
                    .add(assessment_clo::Column::CloId.is_in(clo_ids)),
            )
            .exec(&txn)
            .await?;
        let assessments_deleted = assessment::Entity::delete_many()
            .filter(assessment::Column::CourseId.eq(course.id))
            .exec(&txn)
            .await?
            .rows_affected;
        let assignments_deleted = course_faculty::Entity::delete_many()
            .filter(course_faculty::Column::CourseId.eq(course.id))
            .exec(&txn)
            .await?
            .rows_affected;
        let enrollments_deleted = student_course_enrollment::Entity::delete_many()
            .filter(student_course_enrollment::Column::CourseId.eq(course.id))
            .exec(&txn)
            .await?
            .rows_affected;
        let clos_deleted = clo::Entity::delete_many()
            .filter(clo::Column::CourseId.eq(course.id))
            .exec(&txn)
            .await?
            .rows_affected;
        course::Entity::delete_by_id(course.id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            "User {} deleted course {} with {clos_deleted} CLO(s) and {assessments_deleted} assessment(s)",
            principal.user_id(),
            course.code
        );

        Ok(CourseRemoval {
            course_id: course.id,
            clos_deleted,
            assessments_deleted,
            assignments_deleted,
            enrollments_deleted,
        })
    }

    pub async fn create_clo(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        input: NewClo,
    ) -> Result<clo::Model, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;

        if input.code.trim().is_empty()
            || input.statement.trim().is_empty()
            || input.bloom_level.trim().is_empty()
        {
            return Err(ServiceError::validation(
                "code, statement, and bloomLevel are required",
            ));
        }
        let threshold = input
            .attainment_threshold
            .unwrap_or(DEFAULT_ATTAINMENT_THRESHOLD);
        validate_threshold(threshold)?;

        let now = Utc::now();
        let clo = clo::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            code: Set(input.code.trim().to_string()),
            statement: Set(input.statement.trim().to_string()),
            bloom_level: Set(input.bloom_level.trim().to_string()),
            attainment_threshold: Set(threshold),
            display_order: Set(input.display_order.unwrap_or(0)),
            version: Set(input.version.unwrap_or(1)),
            is_active: Set(true),
            created_by_id: Set(Some(principal.user_id())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|e| ServiceError::from(e).on_conflict("CLO code already exists for this course"))?;

        info!("User {} created {} for course {}", principal.user_id(), clo.code, course.code);
        Ok(clo)
    }

    pub async fn list_clos(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
    ) -> Result<Vec<clo::Model>, ServiceError> {
        let course = principal.require_course_hod(db, course_id).await?;
        active_clos(db, course.id, None).await
    }

    pub async fn update_clo(
        db: &DatabaseConnection,
        principal: &Principal,
        clo_id: Uuid,
        patch: CloPatch,
    ) -> Result<clo::Model, ServiceError> {
        let current = clo::Entity::find_by_id(clo_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("CLO", clo_id))?;
        principal.require_course_hod(db, current.course_id).await?;

        if let Some(threshold) = patch.attainment_threshold {
            validate_threshold(threshold)?;
        }

        let mut active: clo::ActiveModel = current.into();
        if let Some(code) = patch.code.filter(|c| !c.trim().is_empty()) {
            active.code = Set(code.trim().to_string());
        }
        if let Some(statement) = patch.statement.filter(|s| !s.trim().is_empty()) {
            active.statement = Set(statement.trim().to_string());
        }
        if let Some(bloom_level) = patch.bloom_level.filter(|b| !b.trim().is_empty()) {
            active.bloom_level = Set(bloom_level.trim().to_string());
        }
        if let Some(threshold) = patch.attainment_threshold {
            active.attainment_threshold = Set(threshold);
        }
        if let Some(order) = patch.display_order {
            active.display_order = Set(order);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let clo = active
            .update(db)
            .await
            .map_err(|e| ServiceError::from(e).on_conflict("CLO code already exists for this course"))?;

        info!("User {} updated CLO {}", principal.user_id(), clo.id);
        Ok(clo)
    }
}

/// Departments the caller belongs to or heads
async fn visible_departments<C: ConnectionTrait>(
    db: &C,
    principal: &Principal,
) -> Result<Vec<department::Model>, ServiceError> {
    let mut condition = Condition::any().add(department::Column::HodId.eq(principal.user_id()));
    if let Some(department_id) = principal.user.department_id {
        condition = condition.add(department::Column::Id.eq(department_id));
    }

    Ok(department::Entity::find()
        .filter(condition)
        .order_by_asc(department::Column::Name)
        .all(db)
        .await?)
}

fn validate_credits(credits: i32) -> Result<(), ServiceError> {
    if credits <= 0 {
        return Err(ServiceError::validation("Credits must be greater than 0"));
    }
    Ok(())
}

fn validate_threshold(threshold: f64) -> Result<(), ServiceError> {
    if !valid_attainment_threshold(threshold) {
        return Err(ServiceError::validation(
            "Attainment threshold must be between 0 and 100",
        ));
    }
    Ok(())
}

fn parse_course_type(value: Option<&str>) -> Result<Option<CourseType>, ServiceError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| CourseType::from_str(v.trim()).map_err(|_| ServiceError::validation("Invalid type")))
        .transpose()
}

fn parse_category(value: Option<&str>) -> Result<Option<CourseCategory>, ServiceError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            CourseCategory::from_str(v.trim()).map_err(|_| ServiceError::validation("Invalid category"))
        })
        .transpose()
}
