use crate::{
    entities::{assessment, assessment_clo, clo, course, faculty, mark, student, student_course_enrollment},
    error::{InvalidMark, ServiceError},
    services::access::{
        self, Principal, find_active_assessment, require_assessment_owner,
        require_assessment_reader,
    },
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use models::{
    catalog::{EnrollmentStatus, is_practical},
    lifecycle::{AssessmentState, EDITABLE_AFTER_MARKS},
    marks::{MARKS_EPSILON, MarksCap, allocation_matches, round2},
    term::Term,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Input for a new assessment
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub max_marks: f64,
    pub weightage: f64,
    pub assessment_type: String,
    pub mode: Option<String>,
    pub sub_type: Option<String>,
    pub semester: i32,
    pub year: i32,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub submission_deadline: Option<DateTime<Utc>>,
}

/// Partial update of an assessment; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct AssessmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub max_marks: Option<f64>,
    pub weightage: Option<f64>,
    pub assessment_type: Option<String>,
    pub mode: Option<String>,
    pub sub_type: Option<String>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub submission_deadline: Option<DateTime<Utc>>,
}

impl AssessmentPatch {
    /// Wire names of every field the patch sets
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        [
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("maxMarks", self.max_marks.is_some()),
            ("weightage", self.weightage.is_some()),
            ("type", self.assessment_type.is_some()),
            ("mode", self.mode.is_some()),
            ("subType", self.sub_type.is_some()),
            ("semester", self.semester.is_some()),
            ("year", self.year.is_some()),
            ("scheduledDate", self.scheduled_date.is_some()),
            ("submissionDeadline", self.submission_deadline.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Supplied fields that stop being editable once marks exist
    pub fn locked_fields(&self) -> Vec<String> {
        self.supplied_fields()
            .into_iter()
            .filter(|field| !EDITABLE_AFTER_MARKS.contains(field))
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBrief {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub credits: i32,
}

impl From<&course::Model> for CourseBrief {
    fn from(course: &course::Model) -> Self {
        Self {
            id: course.id,
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyBrief {
    pub id: Uuid,
    pub name: String,
    pub designation: Option<String>,
}

impl From<&faculty::Model> for FacultyBrief {
    fn from(faculty: &faculty::Model) -> Self {
        Self {
            id: faculty.id,
            name: faculty.name.clone(),
            designation: faculty.designation.clone(),
        }
    }
}

/// Marks-cap summary for a course and term
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksSummary {
    pub max_course_marks: f64,
    pub current_total: f64,
    pub remaining: f64,
    pub percentage_used: f64,
}

impl From<MarksCap> for MarksSummary {
    fn from(cap: MarksCap) -> Self {
        Self {
            max_course_marks: cap.max_course_marks,
            current_total: cap.current_total,
            remaining: cap.remaining(),
            percentage_used: round2(cap.percentage_used()),
        }
    }
}

/// One CLO's share of an assessment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationView {
    pub clo_id: Uuid,
    pub clo_code: String,
    pub statement: String,
    pub bloom_level: String,
    pub attainment_threshold: f64,
    pub marks_allocated: f64,
    pub weightage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentView {
    #[serde(flatten)]
    pub assessment: assessment::Model,
    pub faculty: Option<FacultyBrief>,
    pub clos: Vec<AllocationView>,
    pub marks_count: u64,
    pub state: AssessmentState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAssessment {
    pub assessment: assessment::Model,
    pub course: CourseBrief,
    pub marks_summary: MarksSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssessments {
    pub course: CourseBrief,
    pub assessments: Vec<AssessmentView>,
    pub marks_summary: MarksSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableMarks {
    pub course: CourseBrief,
    pub marks_summary: MarksSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub view: AssessmentView,
    pub course: CourseBrief,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedAssessment {
    pub assessment: assessment::Model,
    pub finalized_by: FacultyBrief,
    pub marks_count: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStatistics {
    pub enrolled_students: u64,
    pub students_with_marks: u64,
    pub marks_entered: u64,
    /// One mark per enrolled student per allocated CLO
    pub expected_entries: u64,
    pub missing_entries: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationStatus {
    pub assessment_id: Uuid,
    pub title: String,
    pub is_marks_finalized: bool,
    pub marks_finalized_at: Option<DateTime<Utc>>,
    pub marks_finalized_by: Option<FacultyBrief>,
    pub state: AssessmentState,
    pub can_finalize: bool,
    pub can_unfinalize: bool,
    pub statistics: EntryStatistics,
}

pub struct AssessmentService;

impl AssessmentService {
    /// Creates an assessment after the assignment, marks-cap and
    /// single-practical checks.
    ///
    /// The cap check and the insert share one serializable transaction so
    /// two concurrent creates cannot jointly overshoot the cap.
    pub async fn create(
        db: &DatabaseConnection,
        principal: &Principal,
        input: NewAssessment,
    ) -> Result<CreatedAssessment, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        validate_new(&input)?;

        let course = find_active_course(db, input.course_id).await?;
        let term = Term::new(input.semester, input.year);
        access::require_assignment(db, faculty.id, course.id, Some(term)).await?;

        let assessment_type = normalize_type(&input.assessment_type);
        let txn = db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let cap = marks_cap(&txn, &course, Some(term), None).await?;
        if !cap.fits(input.max_marks) {
            warn!(
                "Rejected assessment for course {}: {} + {} exceeds cap {}",
                course.code, cap.current_total, input.max_marks, cap.max_course_marks
            );
            return Err(cap_exceeded(cap, input.max_marks));
        }

        if is_practical(&assessment_type) {
            if let Some(existing) = find_practical(&txn, course.id, term, None).await? {
                return Err(ServiceError::DuplicatePractical {
                    existing_assessment_id: existing.id,
                });
            }
        }

        let now = Utc::now();
        let assessment = assessment::ActiveModel {
            id: Set(Uuid::new_v4()),
            course_id: Set(course.id),
            faculty_id: Set(faculty.id),
            title: Set(input.title.trim().to_string()),
            description: Set(input.description),
            max_marks: Set(input.max_marks),
            weightage: Set(input.weightage),
            assessment_type: Set(assessment_type),
            mode: Set(input.mode),
            sub_type: Set(input.sub_type),
            semester: Set(term.semester),
            year: Set(term.year),
            scheduled_date: Set(input.scheduled_date),
            submission_deadline: Set(input.submission_deadline),
            is_active: Set(true),
            is_marks_finalized: Set(false),
            marks_finalized_at: Set(None),
            marks_finalized_by_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        info!(
            "Faculty {} created assessment {} ({} marks) for course {}",
            faculty.id, assessment.id, assessment.max_marks, course.code
        );

        Ok(CreatedAssessment {
            course: CourseBrief::from(&course),
            marks_summary: cap.with_added(assessment.max_marks).into(),
            assessment,
        })
    }

    /// Lists a course's active assessments with allocations, mark counts and
    /// the marks-cap summary for the requested term
    pub async fn list_for_course(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        term: Option<Term>,
    ) -> Result<CourseAssessments, ServiceError> {
        principal.faculty_profile(db).await?;
        let course = find_course(db, course_id).await?;

        let mut query = assessment::Entity::find()
            .filter(assessment::Column::CourseId.eq(course_id))
            .filter(assessment::Column::IsActive.eq(true));
        if let Some(term) = term {
            query = query
                .filter(assessment::Column::Semester.eq(term.semester))
                .filter(assessment::Column::Year.eq(term.year));
        }
        let assessments = query
            .order_by_asc(assessment::Column::ScheduledDate)
            .order_by_asc(assessment::Column::CreatedAt)
            .all(db)
            .await?;

        let assessments = Self::build_views(db, assessments).await?;
        let cap = marks_cap(db, &course, term, None).await?;

        Ok(CourseAssessments {
            course: CourseBrief::from(&course),
            assessments,
            marks_summary: cap.into(),
        })
    }

    /// Gets one assessment; visible to its creator and to faculty assigned to
    /// the course in the assessment's term
    pub async fn get(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<AssessmentDetail, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        require_assessment_reader(db, &faculty, &assessment).await?;

        let course = find_course(db, assessment.course_id).await?;
        let view = Self::build_views(db, vec![assessment])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found("Assessment", assessment_id))?;

        Ok(AssessmentDetail {
            view,
            course: CourseBrief::from(&course),
        })
    }

    /// Marks-cap headroom for a course the faculty teaches
    pub async fn available_marks(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        term: Option<Term>,
    ) -> Result<AvailableMarks, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        access::require_assignment(db, faculty.id, course_id, term).await?;
        let course = find_course(db, course_id).await?;
        let cap = marks_cap(db, &course, term, None).await?;

        Ok(AvailableMarks {
            course: CourseBrief::from(&course),
            marks_summary: cap.into(),
        })
    }

    /// Updates an assessment.
    ///
    /// Once marks exist only the description and dates may change. Without
    /// marks, structural changes re-run the cap and practical checks.
    pub async fn update(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
        patch: AssessmentPatch,
    ) -> Result<assessment::Model, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let current = find_active_assessment(db, assessment_id).await?;
        require_assessment_owner(&faculty, &current, "update")?;

        let locked = patch.locked_fields();
        let (state, marks_count) = lifecycle_state(db, &current).await?;
        if !locked.is_empty() && !state.structure_editable() {
            if marks_count > 0 {
                return Err(ServiceError::LockedByMarks {
                    message: "Cannot update assessment details after marks have been entered. Only description and dates can be modified.".into(),
                    marks_count,
                    disallowed_fields: locked,
                });
            }
            return Err(ServiceError::MarksFinalized {
                finalized_at: current.marks_finalized_at,
            });
        }
        validate_patch(&patch)?;

        let target_term = Term::new(
            patch.semester.unwrap_or(current.semester),
            patch.year.unwrap_or(current.year),
        );
        let target_max = patch.max_marks.unwrap_or(current.max_marks);
        let target_type = patch
            .assessment_type
            .as_deref()
            .map(normalize_type)
            .unwrap_or_else(|| current.assessment_type.clone());

        let term_changed = target_term != Term::new(current.semester, current.year);
        if term_changed {
            access::require_assignment(db, faculty.id, current.course_id, Some(target_term))
                .await?;
        }

        let txn = db
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        if term_changed || (target_max - current.max_marks).abs() > MARKS_EPSILON {
            let course = find_course(&txn, current.course_id).await?;
            let cap = marks_cap(&txn, &course, Some(target_term), Some(current.id)).await?;
            if !cap.fits(target_max) {
                return Err(cap_exceeded(cap, target_max));
            }

            let allocations = assessment_clo::Entity::find()
                .filter(assessment_clo::Column::AssessmentId.eq(current.id))
                .all(&txn)
                .await?;
            let total_allocated: f64 = allocations.iter().map(|a| a.marks_allocated).sum();
            if !allocations.is_empty() && !allocation_matches(total_allocated, target_max) {
                return Err(ServiceError::AllocationMismatch {
                    total_allocated,
                    max_marks: target_max,
                });
            }
        }

        if is_practical(&target_type)
            && (term_changed || !is_practical(&current.assessment_type))
        {
            if let Some(existing) =
                find_practical(&txn, current.course_id, target_term, Some(current.id)).await?
            {
                return Err(ServiceError::DuplicatePractical {
                    existing_assessment_id: existing.id,
                });
            }
        }

        let mut active: assessment::ActiveModel = current.into();
        if let Some(title) = patch.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if patch.max_marks.is_some() {
            active.max_marks = Set(target_max);
        }
        if let Some(weightage) = patch.weightage {
            active.weightage = Set(weightage);
        }
        if patch.assessment_type.is_some() {
            active.assessment_type = Set(target_type);
        }
        if let Some(mode) = patch.mode {
            active.mode = Set(Some(mode));
        }
        if let Some(sub_type) = patch.sub_type {
            active.sub_type = Set(Some(sub_type));
        }
        if term_changed {
            active.semester = Set(target_term.semester);
            active.year = Set(target_term.year);
        }
        if let Some(date) = patch.scheduled_date {
            active.scheduled_date = Set(Some(date));
        }
        if let Some(deadline) = patch.submission_deadline {
            active.submission_deadline = Set(Some(deadline));
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        info!("Faculty {} updated assessment {}", faculty.id, updated.id);
        Ok(updated)
    }

    /// Soft-deletes an assessment that has no marks
    pub async fn delete(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<(), ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let current = find_active_assessment(db, assessment_id).await?;
        require_assessment_owner(&faculty, &current, "delete")?;

        let marks_count = count_marks(db, current.id).await?;
        if marks_count > 0 {
            return Err(ServiceError::LockedByMarks {
                message: "Cannot delete assessment after marks have been entered. Please contact admin if this is necessary.".into(),
                marks_count,
                disallowed_fields: Vec::new(),
            });
        }

        let mut active: assessment::ActiveModel = current.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now());
        active.update(db).await?;

        info!("Faculty {} deleted assessment {}", faculty.id, assessment_id);
        Ok(())
    }

    /// Locks an assessment's marks.
    ///
    /// Every mark must fit its CLO's allocation; marks against CLOs without
    /// an allocation are reported as well.
    pub async fn finalize(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<FinalizedAssessment, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let txn = db.begin().await?;

        let current = find_active_assessment(&txn, assessment_id).await?;
        require_assessment_owner(&faculty, &current, "finalize marks for")?;

        if current.is_marks_finalized {
            return Err(ServiceError::AlreadyFinalized {
                finalized_at: current.marks_finalized_at,
                finalized_by: current.marks_finalized_by_id,
            });
        }

        let invalid_marks = find_invalid_marks(&txn, current.id).await?;
        if !invalid_marks.is_empty() {
            warn!(
                "Finalization of assessment {} blocked by {} invalid mark(s)",
                current.id,
                invalid_marks.len()
            );
            return Err(ServiceError::InvalidMarksPresent { invalid_marks });
        }

        let marks_count = count_marks(&txn, current.id).await?;
        let mut active: assessment::ActiveModel = current.into();
        let now = Utc::now();
        active.is_marks_finalized = Set(true);
        active.marks_finalized_at = Set(Some(now));
        active.marks_finalized_by_id = Set(Some(faculty.id));
        active.updated_at = Set(now);
        let assessment = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Faculty {} finalized marks for assessment {} ({marks_count} marks)",
            faculty.id, assessment.id
        );

        Ok(FinalizedAssessment {
            assessment,
            finalized_by: FacultyBrief::from(&faculty),
            marks_count,
        })
    }

    /// Unlocks finalized marks; only the creator who finalized them may do so
    pub async fn unfinalize(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<assessment::Model, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let current = find_active_assessment(db, assessment_id).await?;
        require_assessment_owner(&faculty, &current, "unfinalize marks for")?;

        if !current.is_marks_finalized {
            return Err(ServiceError::NotFinalized);
        }
        if current.marks_finalized_by_id != Some(faculty.id) {
            return Err(ServiceError::forbidden(
                "Only the faculty who finalized these marks may unlock them",
            ));
        }

        let mut active: assessment::ActiveModel = current.into();
        active.is_marks_finalized = Set(false);
        active.marks_finalized_at = Set(None);
        active.marks_finalized_by_id = Set(None);
        active.updated_at = Set(Utc::now());
        let assessment = active.update(db).await?;

        info!(
            "Faculty {} unfinalized marks for assessment {}",
            faculty.id, assessment.id
        );
        Ok(assessment)
    }

    /// Read-only lock state with entry progress
    pub async fn finalization_status(
        db: &DatabaseConnection,
        principal: &Principal,
        assessment_id: Uuid,
    ) -> Result<FinalizationStatus, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, assessment_id).await?;
        require_assessment_reader(db, &faculty, &assessment).await?;

        let (state, marks_count) = lifecycle_state(db, &assessment).await?;
        let is_owner = access::can_manage_assessment(&faculty, &assessment);

        let finalized_by = match assessment.marks_finalized_by_id {
            Some(id) => faculty::Entity::find_by_id(id)
                .one(db)
                .await?
                .as_ref()
                .map(FacultyBrief::from),
            None => None,
        };

        let enrolled_students = student_course_enrollment::Entity::find()
            .filter(student_course_enrollment::Column::CourseId.eq(assessment.course_id))
            .filter(student_course_enrollment::Column::Semester.eq(assessment.semester))
            .filter(student_course_enrollment::Column::Year.eq(assessment.year))
            .filter(student_course_enrollment::Column::Status.eq(EnrollmentStatus::Enrolled))
            .count(db)
            .await?;
        let allocated_clos = assessment_clo::Entity::find()
            .filter(assessment_clo::Column::AssessmentId.eq(assessment.id))
            .count(db)
            .await?;
        let students_with_marks = mark::Entity::find()
            .select_only()
            .column(mark::Column::StudentId)
            .distinct()
            .filter(mark::Column::AssessmentId.eq(assessment.id))
            .into_tuple::<Uuid>()
            .all(db)
            .await?
            .len() as u64;

        let expected_entries = enrolled_students * allocated_clos;

        Ok(FinalizationStatus {
            assessment_id: assessment.id,
            title: assessment.title.clone(),
            is_marks_finalized: assessment.is_marks_finalized,
            marks_finalized_at: assessment.marks_finalized_at,
            marks_finalized_by: finalized_by,
            state,
            can_finalize: is_owner && state.can_finalize(),
            can_unfinalize: is_owner
                && assessment.is_marks_finalized
                && assessment.marks_finalized_by_id == Some(faculty.id),
            statistics: EntryStatistics {
                enrolled_students,
                students_with_marks,
                marks_entered: marks_count,
                expected_entries,
                missing_entries: expected_entries.saturating_sub(marks_count),
            },
        })
    }

    /// Attaches allocations, mark counts and creator to each assessment
    async fn build_views<C: ConnectionTrait>(
        db: &C,
        assessments: Vec<assessment::Model>,
    ) -> Result<Vec<AssessmentView>, ServiceError> {
        if assessments.is_empty() {
            return Ok(Vec::new());
        }

        let assessment_ids: Vec<Uuid> = assessments.iter().map(|a| a.id).collect();
        let faculty_ids: Vec<Uuid> = assessments.iter().map(|a| a.faculty_id).collect();

        let allocations = assessment_clo::Entity::find()
            .filter(assessment_clo::Column::AssessmentId.is_in(assessment_ids.clone()))
            .find_also_related(clo::Entity)
            .all(db)
            .await?;

        let mut allocations_by_assessment: HashMap<Uuid, Vec<AllocationView>> = HashMap::new();
        for (allocation, clo) in allocations {
            let Some(clo) = clo else { continue };
            allocations_by_assessment
                .entry(allocation.assessment_id)
                .or_default()
                .push(AllocationView {
                    clo_id: clo.id,
                    clo_code: clo.code,
                    statement: clo.statement,
                    bloom_level: clo.bloom_level,
                    attainment_threshold: clo.attainment_threshold,
                    marks_allocated: allocation.marks_allocated,
                    weightage: allocation.weightage,
                });
        }
        for views in allocations_by_assessment.values_mut() {
            views.sort_by(|a, b| a.clo_code.cmp(&b.clo_code));
        }

        let mark_counts: HashMap<Uuid, i64> = mark::Entity::find()
            .select_only()
            .column(mark::Column::AssessmentId)
            .column_as(mark::Column::Id.count(), "count")
            .filter(mark::Column::AssessmentId.is_in(assessment_ids))
            .group_by(mark::Column::AssessmentId)
            .into_tuple::<(Uuid, i64)>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let faculties: HashMap<Uuid, FacultyBrief> = faculty::Entity::find()
            .filter(faculty::Column::Id.is_in(faculty_ids))
            .all(db)
            .await?
            .iter()
            .map(|f| (f.id, FacultyBrief::from(f)))
            .collect();

        Ok(assessments
            .into_iter()
            .map(|assessment| {
                let marks_count = mark_counts
                    .get(&assessment.id)
                    .copied()
                    .unwrap_or(0)
                    .max(0) as u64;
                AssessmentView {
                    faculty: faculties.get(&assessment.faculty_id).cloned(),
                    clos: allocations_by_assessment
                        .remove(&assessment.id)
                        .unwrap_or_default(),
                    marks_count,
                    state: AssessmentState::derive(assessment.is_marks_finalized, marks_count),
                    assessment,
                }
            })
            .collect())
    }
}

/// Assessment types are stored trimmed and lowercased
pub(crate) fn normalize_type(assessment_type: &str) -> String {
    assessment_type.trim().to_lowercase()
}

fn validate_new(input: &NewAssessment) -> Result<(), ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::validation("Title is required"));
    }
    if input.assessment_type.trim().is_empty() {
        return Err(ServiceError::validation("Assessment type is required"));
    }
    validate_max_marks(input.max_marks)?;
    validate_weightage(input.weightage)?;
    validate_term(Term::new(input.semester, input.year))
}

fn validate_patch(patch: &AssessmentPatch) -> Result<(), ServiceError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ServiceError::validation("Title cannot be empty"));
    }
    if patch
        .assessment_type
        .as_deref()
        .is_some_and(|t| t.trim().is_empty())
    {
        return Err(ServiceError::validation("Assessment type cannot be empty"));
    }
    if let Some(max_marks) = patch.max_marks {
        validate_max_marks(max_marks)?;
    }
    if let Some(weightage) = patch.weightage {
        validate_weightage(weightage)?;
    }
    if patch.semester.is_some() || patch.year.is_some() {
        validate_term(Term::new(
            patch.semester.unwrap_or(1),
            patch.year.unwrap_or(2000),
        ))?;
    }
    Ok(())
}

fn validate_max_marks(max_marks: f64) -> Result<(), ServiceError> {
    if !max_marks.is_finite() || max_marks <= 0.0 {
        return Err(ServiceError::validation("Max marks must be greater than 0"));
    }
    Ok(())
}

fn validate_weightage(weightage: f64) -> Result<(), ServiceError> {
    if !weightage.is_finite() || weightage < 0.0 {
        return Err(ServiceError::validation("Weightage cannot be negative"));
    }
    Ok(())
}

pub(crate) fn validate_term(term: Term) -> Result<(), ServiceError> {
    if !term.is_valid() {
        return Err(ServiceError::validation(format!(
            "Invalid term: semester {} of {}",
            term.semester, term.year
        )));
    }
    Ok(())
}

pub(crate) fn cap_exceeded(cap: MarksCap, requested: f64) -> ServiceError {
    ServiceError::MarksCapExceeded {
        max_course_marks: cap.max_course_marks,
        current_total: cap.current_total,
        requested,
        remaining: cap.remaining(),
    }
}

pub(crate) async fn find_course<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(course_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Course", course_id))
}

pub(crate) async fn find_active_course<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
) -> Result<course::Model, ServiceError> {
    course::Entity::find_by_id(course_id)
        .filter(course::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Course", course_id))
}

/// Sum of active assessment max marks for a course, optionally limited to one
/// term and excluding one assessment
pub(crate) async fn marks_cap<C: ConnectionTrait>(
    db: &C,
    course: &course::Model,
    term: Option<Term>,
    exclude: Option<Uuid>,
) -> Result<MarksCap, ServiceError> {
    let mut query = assessment::Entity::find()
        .select_only()
        .column(assessment::Column::MaxMarks)
        .filter(assessment::Column::CourseId.eq(course.id))
        .filter(assessment::Column::IsActive.eq(true));

    if let Some(term) = term {
        query = query
            .filter(assessment::Column::Semester.eq(term.semester))
            .filter(assessment::Column::Year.eq(term.year));
    }
    if let Some(exclude) = exclude {
        query = query.filter(assessment::Column::Id.ne(exclude));
    }

    let current_total: f64 = query.into_tuple::<f64>().all(db).await?.into_iter().sum();
    Ok(MarksCap::new(course.credits, current_total))
}

/// The active practical assessment of a course term, if any
pub(crate) async fn find_practical<C: ConnectionTrait>(
    db: &C,
    course_id: Uuid,
    term: Term,
    exclude: Option<Uuid>,
) -> Result<Option<assessment::Model>, ServiceError> {
    let mut query = assessment::Entity::find()
        .filter(assessment::Column::CourseId.eq(course_id))
        .filter(assessment::Column::Semester.eq(term.semester))
        .filter(assessment::Column::Year.eq(term.year))
        .filter(assessment::Column::IsActive.eq(true))
        .filter(assessment::Column::AssessmentType.eq("practical"));

    if let Some(exclude) = exclude {
        query = query.filter(assessment::Column::Id.ne(exclude));
    }

    Ok(query.one(db).await?)
}

/// Lifecycle state of an assessment together with its mark count
pub(crate) async fn lifecycle_state<C: ConnectionTrait>(
    db: &C,
    assessment: &assessment::Model,
) -> Result<(AssessmentState, u64), ServiceError> {
    let marks_count = count_marks(db, assessment.id).await?;
    Ok((
        AssessmentState::derive(assessment.is_marks_finalized, marks_count),
        marks_count,
    ))
}

pub(crate) async fn count_marks<C: ConnectionTrait>(
    db: &C,
    assessment_id: Uuid,
) -> Result<u64, ServiceError> {
    Ok(mark::Entity::find()
        .filter(mark::Column::AssessmentId.eq(assessment_id))
        .count(db)
        .await?)
}

/// Marks above their CLO allocation, or against a CLO with no allocation
async fn find_invalid_marks<C: ConnectionTrait>(
    db: &C,
    assessment_id: Uuid,
) -> Result<Vec<InvalidMark>, ServiceError> {
    let allocations: HashMap<Uuid, f64> = assessment_clo::Entity::find()
        .filter(assessment_clo::Column::AssessmentId.eq(assessment_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.clo_id, a.marks_allocated))
        .collect();

    let marks = mark::Entity::find()
        .filter(mark::Column::AssessmentId.eq(assessment_id))
        .all(db)
        .await?;

    let offending: Vec<mark::Model> = marks
        .into_iter()
        .filter(|m| match allocations.get(&m.clo_id) {
            Some(allocated) => m.marks_obtained > allocated + MARKS_EPSILON,
            None => true,
        })
        .collect();

    if offending.is_empty() {
        return Ok(Vec::new());
    }

    let student_ids: Vec<Uuid> = offending.iter().map(|m| m.student_id).collect();
    let clo_ids: Vec<Uuid> = offending.iter().map(|m| m.clo_id).collect();

    let roll_numbers: HashMap<Uuid, String> = student::Entity::find()
        .filter(student::Column::Id.is_in(student_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.roll_number))
        .collect();
    let clo_codes: HashMap<Uuid, String> = clo::Entity::find()
        .filter(clo::Column::Id.is_in(clo_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.code))
        .collect();

    Ok(offending
        .into_iter()
        .map(|m| InvalidMark {
            student_id: m.student_id,
            roll_number: roll_numbers.get(&m.student_id).cloned(),
            clo_id: m.clo_id,
            clo_code: clo_codes.get(&m.clo_id).cloned(),
            marks_obtained: m.marks_obtained,
            max_allowed: allocations.get(&m.clo_id).copied(),
        })
        .collect())
}
