use crate::{
    entities::{assessment, assessment_clo, clo, mark, student, student_course_enrollment, user},
    error::{EntryError, ServiceError},
    services::{
        access::{self, Principal, can_view_assessment, find_active_assessment},
        assessment::lifecycle_state,
    },
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use models::{
    catalog::EnrollmentStatus,
    marks::{ScoreStatistics, check_mark, percentage, round2},
    term::Term,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::OnConflict,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// One submitted mark
#[derive(Debug, Clone, Copy)]
pub struct MarkEntry {
    pub student_id: Uuid,
    pub clo_id: Uuid,
    pub marks_obtained: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEntryResult {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<EntryError>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentBrief {
    pub id: Uuid,
    pub roll_number: String,
    pub name: String,
    pub current_semester: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedClo {
    pub clo_id: Uuid,
    pub code: String,
    pub marks_allocated: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloMark {
    pub clo_id: Uuid,
    pub clo_code: String,
    pub marks_obtained: Option<f64>,
    pub marks_allocated: f64,
    pub percentage: f64,
    pub entered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMarks {
    pub student: StudentBrief,
    pub marks: Vec<CloMark>,
    pub total_obtained: f64,
    pub total_allocated: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksSheetSummary {
    pub total_possible: f64,
    pub total_obtained: f64,
    /// Share of expected (student, CLO) entries that have a mark
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentMarks {
    pub assessment_id: Uuid,
    pub title: String,
    pub max_marks: f64,
    pub is_marks_finalized: bool,
    pub clos: Vec<AllocatedClo>,
    pub students: Vec<StudentMarks>,
    pub statistics: ScoreStatistics,
    pub summary: MarksSheetSummary,
}

pub struct MarksService;

impl MarksService {
    /// Upserts a batch of marks.
    ///
    /// Each entry is checked on its own; valid entries are written even when
    /// others are rejected. The call fails only when nothing is valid.
    pub async fn enter_bulk(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
        entries: Vec<MarkEntry>,
    ) -> Result<BulkEntryResult, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        require_mark_writer(db, &faculty, &assessment).await?;

        let (state, _) = lifecycle_state(db, &assessment).await?;
        if !state.accepts_marks() {
            return Err(ServiceError::MarksFinalized {
                finalized_at: assessment.marks_finalized_at,
            });
        }
        if entries.is_empty() {
            return Err(ServiceError::validation("At least one marks entry is required"));
        }

        let term = Term::new(assessment.semester, assessment.year);
        let enrolled: HashSet<Uuid> = enrolled_student_ids(db, assessment.course_id, term).await?;
        let allocations = allocations_by_clo(db, assessment.id).await?;

        let mut errors = Vec::new();
        // Last submission for a (student, CLO) pair wins within one batch
        let mut valid: HashMap<(Uuid, Uuid), f64> = HashMap::new();
        for entry in &entries {
            if !enrolled.contains(&entry.student_id) {
                errors.push(EntryError::new(
                    entry.student_id,
                    Some(entry.clo_id),
                    "Student is not enrolled in this course for the assessment's term",
                ));
                continue;
            }
            let Some(allocation) = allocations.get(&entry.clo_id) else {
                errors.push(EntryError::new(
                    entry.student_id,
                    Some(entry.clo_id),
                    "CLO is not allocated to this assessment",
                ));
                continue;
            };
            if let Err(rejection) = check_mark(entry.marks_obtained, allocation.marks_allocated) {
                errors.push(EntryError::rejected(entry.student_id, entry.clo_id, rejection));
                continue;
            }
            valid.insert((entry.student_id, entry.clo_id), entry.marks_obtained);
        }

        if valid.is_empty() {
            warn!(
                "Rejected all {} marks entries for assessment {}",
                entries.len(),
                assessment.id
            );
            return Err(ServiceError::AllEntriesInvalid { errors });
        }

        let now = Utc::now();
        let rows: Vec<mark::ActiveModel> = valid
            .iter()
            .map(|(&(student_id, clo_id), &marks_obtained)| mark::ActiveModel {
                id: Set(Uuid::new_v4()),
                student_id: Set(student_id),
                assessment_id: Set(assessment.id),
                clo_id: Set(clo_id),
                marks_obtained: Set(marks_obtained),
                entered_by_id: Set(Some(faculty.id)),
                entered_at: Set(now),
                updated_at: Set(now),
            })
            .collect();

        let txn = db.begin().await?;
        mark::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    mark::Column::StudentId,
                    mark::Column::AssessmentId,
                    mark::Column::CloId,
                ])
                .update_columns([
                    mark::Column::MarksObtained,
                    mark::Column::EnteredById,
                    mark::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        txn.commit().await?;

        info!(
            "Faculty {} saved {} mark(s) for assessment {} ({} rejected)",
            faculty.id,
            valid.len(),
            assessment.id,
            errors.len()
        );

        Ok(BulkEntryResult {
            success_count: entries.len() - errors.len(),
            error_count: errors.len(),
            errors,
        })
    }

    /// Mark sheet for an assessment: every enrolled student against every
    /// allocated CLO
    pub async fn assessment_marks(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<AssessmentMarks, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        access::require_assessment_reader(db, &faculty, &assessment).await?;

        let clos = allocated_clos(db, assessment.id).await?;
        let term = Term::new(assessment.semester, assessment.year);
        let roster = roster(db, assessment.course_id, Some(term)).await?;

        let marks: HashMap<(Uuid, Uuid), mark::Model> = mark::Entity::find()
            .filter(mark::Column::AssessmentId.eq(assessment.id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| ((m.student_id, m.clo_id), m))
            .collect();

        let total_allocated: f64 = clos.iter().map(|c| c.marks_allocated).sum();
        let mut entries_present = 0usize;
        let mut students_with_marks = 0usize;
        let mut totals = Vec::with_capacity(roster.len());

        let students: Vec<StudentMarks> = roster
            .into_iter()
            .map(|student| {
                let cells: Vec<CloMark> = clos
                    .iter()
                    .map(|allocated| {
                        let cell = marks.get(&(student.id, allocated.clo_id));
                        clo_mark(allocated, cell)
                    })
                    .collect();

                entries_present += cells.iter().filter(|c| c.marks_obtained.is_some()).count();
                if cells.iter().any(|c| c.marks_obtained.unwrap_or(0.0) > 0.0) {
                    students_with_marks += 1;
                }

                let total_obtained: f64 = cells.iter().filter_map(|c| c.marks_obtained).sum();
                totals.push(total_obtained);

                StudentMarks {
                    student,
                    marks: cells,
                    total_obtained: round2(total_obtained),
                    total_allocated,
                    percentage: round2(percentage(total_obtained, total_allocated)),
                }
            })
            .collect();

        let expected_entries = students.len() * clos.len();
        let total_obtained: f64 = totals.iter().sum();

        Ok(AssessmentMarks {
            assessment_id: assessment.id,
            title: assessment.title,
            max_marks: assessment.max_marks,
            is_marks_finalized: assessment.is_marks_finalized,
            statistics: ScoreStatistics::from_totals(&totals, students_with_marks),
            summary: MarksSheetSummary {
                total_possible: round2(total_allocated * students.len() as f64),
                total_obtained: round2(total_obtained),
                completion_percentage: round2(percentage(
                    entries_present as f64,
                    expected_entries as f64,
                )),
            },
            clos,
            students,
        })
    }

    /// One student's marks for an assessment
    pub async fn student_marks(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
        student_id: Uuid,
    ) -> Result<StudentMarks, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        access::require_assessment_reader(db, &faculty, &assessment).await?;

        let student = student_brief(db, student_id).await?;
        let clos = allocated_clos(db, assessment.id).await?;
        let marks: HashMap<Uuid, mark::Model> = mark::Entity::find()
            .filter(mark::Column::AssessmentId.eq(assessment.id))
            .filter(mark::Column::StudentId.eq(student_id))
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.clo_id, m))
            .collect();

        let cells: Vec<CloMark> = clos
            .iter()
            .map(|allocated| clo_mark(allocated, marks.get(&allocated.clo_id)))
            .collect();
        let total_obtained: f64 = cells.iter().filter_map(|c| c.marks_obtained).sum();
        let total_allocated: f64 = clos.iter().map(|c| c.marks_allocated).sum();

        Ok(StudentMarks {
            student,
            marks: cells,
            total_obtained: round2(total_obtained),
            total_allocated,
            percentage: round2(percentage(total_obtained, total_allocated)),
        })
    }

    /// Enrolled students of a course the faculty teaches
    pub async fn course_students(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        term: Option<Term>,
    ) -> Result<Vec<StudentBrief>, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        access::require_assignment(db, faculty.id, course_id, term).await?;

        roster(db, course_id, term).await
    }
}

/// The creator and faculty assigned to the assessment's term may enter marks
pub(crate) async fn require_mark_writer<C: ConnectionTrait>(
    db: &C,
    faculty: &crate::entities::faculty::Model,
    assessment: &assessment::Model,
) -> Result<(), ServiceError> {
    if can_view_assessment(db, faculty, assessment).await? {
        Ok(())
    } else {
        Err(ServiceError::forbidden(
            "You do not have permission to enter marks for this assessment",
        ))
    }
}

fn clo_mark(allocated: &AllocatedClo, cell: Option<&mark::Model>) -> CloMark {
    let marks_obtained = cell.map(|m| m.marks_obtained);
    CloMark {
        clo_id: allocated.clo_id,
        clo_code: allocated.code.clone(),
        marks_obtained,
        marks_allocated: allocated.marks_allocated,
        percentage: round2(percentage(
            marks_obtained.unwrap_or(0.0),
            allocated.marks_allocated,
        )),
        entered_at: cell.map(|m| m.updated_at),
    }
}

pub(crate) async fn allocations_by_clo<C: ConnectionTrait>(
    db: &C,
    assessment_id: Uuid,
) -> Result<HashMap<Uuid, assessment_clo::Model>, ServiceError> {
    Ok(assessment_clo::Entity::find()
        .filter(assessment_clo::Column::AssessmentId.eq(assessment_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.clo_id, a))
        .collect())
}

async fn allocated_clos<C: ConnectionTrait>(
    db: &C,
    assessment_id: Uuid,
) -> Result<Vec<AllocatedClo>, ServiceError> {
    let mut clos: Vec<AllocatedClo> = assessment_clo::Entity::find()
        .filter(assessment_clo::Column::AssessmentId.eq(assessment_id))
        .find_also_related(clo::Entity)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(allocation, clo)| {
            clo.map(|clo| AllocatedClo {
                clo_id: clo.id,
                code: clo.code,
                marks_allocated: allocation.marks_allocated,
            })
        })
        .collect();
    clos.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(clos)
}

pub(crate) async fn enrolled_student_ids<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
    term: Term,
) -> Result<HashSet<Uuid>, ServiceError> {
    Ok(enrollments(course_id, Some(term))
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.student_id)
        .collect())
}

fn enrollments(
    course_id: Uuid,
    term: Option<Term>,
) -> sea_orm::Select<student_course_enrollment::Entity> {
    let mut query = student_course_enrollment::Entity::find()
        .filter(student_course_enrollment::Column::CourseId.eq(course_id))
        .filter(student_course_enrollment::Column::Status.eq(EnrollmentStatus::Enrolled));

    if let Some(term) = term {
        query = query
            .filter(student_course_enrollment::Column::Semester.eq(term.semester))
            .filter(student_course_enrollment::Column::Year.eq(term.year));
    }
    query
}

/// Enrolled students ordered by roll number
async fn roster<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
    term: Option<Term>,
) -> Result<Vec<StudentBrief>, ServiceError> {
    let student_ids: Vec<Uuid> = enrollments(course_id, term)
        .all(db)
        .await?
        .into_iter()
        .map(|e| e.student_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if student_ids.is_empty() {
        return Ok(Vec::new());
    }

    let students = student::Entity::find()
        .filter(student::Column::Id.is_in(student_ids))
        .find_also_related(user::Entity)
        .order_by_asc(student::Column::RollNumber)
        .all(db)
        .await?;

    Ok(students
        .into_iter()
        .map(|(student, user)| to_brief(student, user))
        .collect())
}

async fn student_brief<C: ConnectionTrait>(
    db: &C,
    student_id: Uuid,
) -> Result<StudentBrief, ServiceError> {
    student::Entity::find_by_id(student_id)
        .find_also_related(user::Entity)
        .one(db)
        .await?
        .map(|(student, user)| to_brief(student, user))
        .ok_or_else(|| ServiceError::not_found("Student", student_id))
}

fn to_brief(student: student::Model, user: Option<user::Model>) -> StudentBrief {
    StudentBrief {
        id: student.id,
        name: user.map(|u| u.name).unwrap_or_default(),
        roll_number: student.roll_number,
        current_semester: student.current_semester,
    }
}
