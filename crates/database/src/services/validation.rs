use crate::{
    error::ServiceError,
    services::{
        access::{self, Principal, find_active_assessment},
        assessment::{find_course, find_practical, marks_cap, normalize_type, validate_term},
        marks::{allocations_by_clo, enrolled_student_ids, require_mark_writer},
    },
};
use log::debug;
use models::{
    catalog::is_practical,
    marks::{CapVerdict, check_mark, recommended_practical_marks},
    term::Term,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

/// A proposed assessment to dry-run
#[derive(Debug, Clone)]
pub struct AssessmentProposal {
    pub course_id: Uuid,
    pub assessment_type: String,
    pub max_marks: f64,
    pub semester: i32,
    pub year: i32,
}

/// A proposed mark to dry-run
#[derive(Debug, Clone, Copy)]
pub struct MarkProposal {
    pub assessment_id: Uuid,
    pub student_id: Uuid,
    pub clo_id: Uuid,
    pub marks_obtained: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalBrief {
    pub id: Uuid,
    pub title: String,
    pub max_marks: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalCheck {
    pub has_practical: bool,
    pub existing_assessment: Option<PracticalBrief>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticalVerdict {
    pub allowed: bool,
    pub message: String,
    pub existing_assessment: Option<PracticalBrief>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentVerdict {
    pub allowed: bool,
    pub marks_validation: CapVerdict,
    pub practical_validation: Option<PracticalVerdict>,
    pub course_credits: i32,
    pub recommended_practical_marks: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkVerdict {
    pub allowed: bool,
    pub max_marks: f64,
    pub entered_marks: f64,
    pub enrolled: bool,
    pub message: String,
}

/// Runs the create and entry checks without writing anything
pub struct ValidationService;

impl ValidationService {
    pub async fn has_practical(
        db: &DatabaseConnection,
        principal: &Principal,
        course_id: Uuid,
        term: Term,
    ) -> Result<PracticalCheck, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        access::require_assignment(db, faculty.id, course_id, Some(term)).await?;

        let existing = find_practical(db, course_id, term, None)
            .await?
            .map(|a| PracticalBrief {
                id: a.id,
                title: a.title,
                max_marks: a.max_marks,
            });

        Ok(PracticalCheck {
            has_practical: existing.is_some(),
            existing_assessment: existing,
        })
    }

    pub async fn validate_assessment(
        db: &DatabaseConnection,
        principal: &Principal,
        proposal: AssessmentProposal,
    ) -> Result<AssessmentVerdict, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let term = Term::new(proposal.semester, proposal.year);
        validate_term(term)?;
        if !proposal.max_marks.is_finite() || proposal.max_marks <= 0.0 {
            return Err(ServiceError::validation("Max marks must be greater than 0"));
        }

        access::require_assignment(db, faculty.id, proposal.course_id, Some(term)).await?;
        let course = find_course(db, proposal.course_id).await?;

        let marks_validation = marks_cap(db, &course, Some(term), None)
            .await?
            .verdict(proposal.max_marks);

        let practical_validation = if is_practical(&normalize_type(&proposal.assessment_type)) {
            let existing = find_practical(db, course.id, term, None).await?;
            Some(PracticalVerdict {
                allowed: existing.is_none(),
                message: if existing.is_some() {
                    "Course already has a practical assessment".into()
                } else {
                    "Can create practical assessment".into()
                },
                existing_assessment: existing.map(|a| PracticalBrief {
                    id: a.id,
                    title: a.title,
                    max_marks: a.max_marks,
                }),
            })
        } else {
            None
        };

        let allowed = marks_validation.allowed
            && practical_validation.as_ref().is_none_or(|p| p.allowed);
        debug!(
            "Dry-run assessment for course {} ({} marks): allowed={allowed}",
            course.code, proposal.max_marks
        );

        Ok(AssessmentVerdict {
            allowed,
            marks_validation,
            practical_validation,
            course_credits: course.credits,
            recommended_practical_marks: recommended_practical_marks(course.credits),
        })
    }

    pub async fn validate_marks(
        db: &DatabaseConnection,
        principal: &Principal,
        proposal: MarkProposal,
    ) -> Result<MarkVerdict, ServiceError> {
        let faculty = principal.faculty_profile(db).await?;
        let assessment = find_active_assessment(db, proposal.assessment_id).await?;
        require_mark_writer(db, &faculty, &assessment).await?;

        let allocations = allocations_by_clo(db, assessment.id).await?;
        let Some(allocation) = allocations.get(&proposal.clo_id) else {
            return Err(ServiceError::validation(
                "CLO is not allocated to this assessment",
            ));
        };

        let term = Term::new(assessment.semester, assessment.year);
        let enrolled = enrolled_student_ids(db, assessment.course_id, term)
            .await?
            .contains(&proposal.student_id);

        let checked = check_mark(proposal.marks_obtained, allocation.marks_allocated);
        let message = match (&checked, enrolled) {
            (Err(rejection), _) => rejection.to_string(),
            (Ok(()), false) => {
                "Student is not enrolled in this course for the assessment's term".into()
            }
            (Ok(()), true) => format!(
                "Marks are within allowed range (0-{})",
                allocation.marks_allocated
            ),
        };

        Ok(MarkVerdict {
            allowed: checked.is_ok() && enrolled && !assessment.is_marks_finalized,
            max_marks: allocation.marks_allocated,
            entered_marks: proposal.marks_obtained,
            enrolled,
            message: if assessment.is_marks_finalized {
                "Marks are finalized for this assessment".into()
            } else {
                message
            },
        })
    }
}
