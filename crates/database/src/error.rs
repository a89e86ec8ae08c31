use chrono::{DateTime, Utc};
use models::{marks::MarkRejection, term::Term};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

/// A mark that fails its CLO allocation at finalization time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidMark {
    pub student_id: Uuid,
    pub roll_number: Option<String>,
    pub clo_id: Uuid,
    pub clo_code: Option<String>,
    pub marks_obtained: f64,
    /// None when the CLO carries no allocation for the assessment
    pub max_allowed: Option<f64>,
}

/// A rejected entry of a bulk marks submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryError {
    pub student_id: Uuid,
    pub clo_id: Option<Uuid>,
    pub error: String,
}

impl EntryError {
    pub fn new(student_id: Uuid, clo_id: Option<Uuid>, error: impl Into<String>) -> Self {
        Self {
            student_id,
            clo_id,
            error: error.into(),
        }
    }

    pub fn rejected(student_id: Uuid, clo_id: Uuid, rejection: MarkRejection) -> Self {
        Self::new(student_id, Some(clo_id), rejection.to_string())
    }
}

/// Errors surfaced by the record services.
///
/// Every variant except [`ServiceError::Database`] is a domain rejection that
/// is raised before any write happens.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Faculty profile not found")]
    FacultyProfileNotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("You are not assigned to this course")]
    NotAssigned { course_id: Uuid, term: Option<Term> },

    #[error(
        "Cannot create assessment. Total marks would exceed {max_course_marks}. Currently using {current_total} marks, only {remaining} remaining."
    )]
    MarksCapExceeded {
        max_course_marks: f64,
        current_total: f64,
        requested: f64,
        remaining: f64,
    },

    #[error(
        "This course already has a practical assessment. Only one practical assessment is allowed per course per term."
    )]
    DuplicatePractical { existing_assessment_id: Uuid },

    #[error("At least one valid PO or PSO mapping is required")]
    NoValidMappings,

    #[error("{message}")]
    LockedByMarks {
        message: String,
        marks_count: u64,
        disallowed_fields: Vec<String>,
    },

    #[error("Marks are already finalized for this assessment")]
    AlreadyFinalized {
        finalized_at: Option<DateTime<Utc>>,
        finalized_by: Option<Uuid>,
    },

    #[error("Marks are not finalized for this assessment")]
    NotFinalized,

    #[error("Marks are finalized for this assessment and can no longer be changed")]
    MarksFinalized { finalized_at: Option<DateTime<Utc>> },

    #[error("Cannot finalize marks. {} mark(s) exceed their CLO allocation.", .invalid_marks.len())]
    InvalidMarksPresent { invalid_marks: Vec<InvalidMark> },

    #[error(
        "Total allocated marks ({total_allocated}) must equal assessment max marks ({max_marks})"
    )]
    AllocationMismatch { total_allocated: f64, max_marks: f64 },

    #[error("Some CLOs do not belong to this course")]
    ForeignClos { clo_ids: Vec<Uuid> },

    #[error("All marks entries have errors")]
    AllEntriesInvalid { errors: Vec<EntryError> },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    UniqueConstraintViolation(String),

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::UniqueConstraintViolation(detail)
            }
            _ => Self::Database(err),
        }
    }
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Replaces the store's unique-violation detail with a caller-facing message
    pub fn on_conflict(self, message: &str) -> Self {
        match self {
            Self::UniqueConstraintViolation(_) => Self::UniqueConstraintViolation(message.into()),
            other => other,
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::FacultyProfileNotFound => "FACULTY_PROFILE_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::NotAssigned { .. } => "NOT_ASSIGNED",
            Self::MarksCapExceeded { .. } => "MARKS_CAP_EXCEEDED",
            Self::DuplicatePractical { .. } => "DUPLICATE_PRACTICAL",
            Self::NoValidMappings => "NO_VALID_MAPPINGS",
            Self::LockedByMarks { .. } => "LOCKED_BY_MARKS",
            Self::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            Self::NotFinalized => "NOT_FINALIZED",
            Self::MarksFinalized { .. } => "MARKS_FINALIZED",
            Self::InvalidMarksPresent { .. } => "INVALID_MARKS_PRESENT",
            Self::AllocationMismatch { .. } => "ALLOCATION_MISMATCH",
            Self::ForeignClos { .. } => "FOREIGN_CLOS",
            Self::AllEntriesInvalid { .. } => "ALL_ENTRIES_INVALID",
            Self::Validation(_) => "VALIDATION",
            Self::UniqueConstraintViolation(_) => "UNIQUE_CONSTRAINT_VIOLATION",
            Self::Database(_) => "DATABASE",
        }
    }

    /// Structured payload a client needs to act on the rejection
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::NotFound { entity, id } => Some(json!({ "entity": entity, "id": id })),
            Self::NotAssigned { course_id, term } => Some(json!({
                "courseId": course_id,
                "semester": term.map(|t| t.semester),
                "year": term.map(|t| t.year),
            })),
            Self::MarksCapExceeded {
                max_course_marks,
                current_total,
                requested,
                remaining,
            } => Some(json!({
                "maxCourseMarks": max_course_marks,
                "currentTotal": current_total,
                "requested": requested,
                "remaining": remaining,
            })),
            Self::DuplicatePractical {
                existing_assessment_id,
            } => Some(json!({ "existingAssessmentId": existing_assessment_id })),
            Self::LockedByMarks {
                marks_count,
                disallowed_fields,
                ..
            } => Some(json!({
                "marksCount": marks_count,
                "disallowedFields": disallowed_fields,
                "allowedFields": models::lifecycle::EDITABLE_AFTER_MARKS,
            })),
            Self::AlreadyFinalized {
                finalized_at,
                finalized_by,
            } => Some(json!({
                "finalizedAt": finalized_at,
                "finalizedBy": finalized_by,
            })),
            Self::MarksFinalized { finalized_at } => {
                Some(json!({ "finalizedAt": finalized_at }))
            }
            Self::InvalidMarksPresent { invalid_marks } => {
                Some(json!({ "invalidMarks": invalid_marks }))
            }
            Self::AllocationMismatch {
                total_allocated,
                max_marks,
            } => Some(json!({
                "totalAllocated": total_allocated,
                "maxMarks": max_marks,
                "difference": max_marks - total_allocated,
            })),
            Self::ForeignClos { clo_ids } => Some(json!({ "cloIds": clo_ids })),
            Self::AllEntriesInvalid { errors } => Some(json!({ "errors": errors })),
            _ => None,
        }
    }
}
