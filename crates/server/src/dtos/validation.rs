use database::services::validation::{AssessmentProposal, MarkProposal};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateAssessmentRequest {
    pub course_id: Uuid,
    #[serde(rename = "type")]
    pub assessment_type: String,
    pub max_marks: f64,
    pub semester: i32,
    pub year: i32,
}

impl From<ValidateAssessmentRequest> for AssessmentProposal {
    fn from(req: ValidateAssessmentRequest) -> Self {
        Self {
            course_id: req.course_id,
            assessment_type: req.assessment_type,
            max_marks: req.max_marks,
            semester: req.semester,
            year: req.year,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateMarksRequest {
    pub assessment_id: Uuid,
    pub student_id: Uuid,
    pub clo_id: Uuid,
    pub marks_obtained: f64,
}

impl From<ValidateMarksRequest> for MarkProposal {
    fn from(req: ValidateMarksRequest) -> Self {
        Self {
            assessment_id: req.assessment_id,
            student_id: req.student_id,
            clo_id: req.clo_id,
            marks_obtained: req.marks_obtained,
        }
    }
}
