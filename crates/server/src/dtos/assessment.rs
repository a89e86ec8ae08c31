use chrono::{DateTime, Utc};
use database::services::{
    allocation::AllocationInput,
    assessment::{AssessmentPatch, NewAssessment},
    marks::MarkEntry,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub max_marks: f64,
    #[serde(default)]
    pub weightage: f64,
    #[serde(rename = "type")]
    pub assessment_type: String,
    pub mode: Option<String>,
    pub sub_type: Option<String>,
    pub semester: i32,
    pub year: i32,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub submission_deadline: Option<DateTime<Utc>>,
}

impl From<CreateAssessmentRequest> for NewAssessment {
    fn from(req: CreateAssessmentRequest) -> Self {
        Self {
            course_id: req.course_id,
            title: req.title,
            description: req.description,
            max_marks: req.max_marks,
            weightage: req.weightage,
            assessment_type: req.assessment_type,
            mode: req.mode,
            sub_type: req.sub_type,
            semester: req.semester,
            year: req.year,
            scheduled_date: req.scheduled_date,
            submission_deadline: req.submission_deadline,
        }
    }
}

/// Only the supplied fields change
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssessmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub max_marks: Option<f64>,
    pub weightage: Option<f64>,
    #[serde(rename = "type")]
    pub assessment_type: Option<String>,
    pub mode: Option<String>,
    pub sub_type: Option<String>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub submission_deadline: Option<DateTime<Utc>>,
}

impl From<UpdateAssessmentRequest> for AssessmentPatch {
    fn from(req: UpdateAssessmentRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            max_marks: req.max_marks,
            weightage: req.weightage,
            assessment_type: req.assessment_type,
            mode: req.mode,
            sub_type: req.sub_type,
            semester: req.semester,
            year: req.year,
            scheduled_date: req.scheduled_date,
            submission_deadline: req.submission_deadline,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloAllocationRequest {
    pub clo_id: Uuid,
    pub marks_allocated: f64,
    pub weightage: Option<f64>,
    pub bloom_level: Option<String>,
}

/// Replaces every CLO allocation of an assessment
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AllocateClosRequest {
    #[serde(default)]
    pub clo_allocations: Vec<CloAllocationRequest>,
}

impl AllocateClosRequest {
    pub fn into_inputs(self) -> Vec<AllocationInput> {
        self.clo_allocations
            .into_iter()
            .map(|a| AllocationInput {
                clo_id: a.clo_id,
                marks_allocated: a.marks_allocated,
                weightage: a.weightage,
                bloom_level: a.bloom_level,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkEntryRequest {
    pub student_id: Uuid,
    pub clo_id: Uuid,
    pub marks_obtained: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkMarksRequest {
    #[serde(default)]
    pub marks_entries: Vec<MarkEntryRequest>,
}

impl BulkMarksRequest {
    pub fn into_entries(self) -> Vec<MarkEntry> {
        self.marks_entries
            .into_iter()
            .map(|m| MarkEntry {
                student_id: m.student_id,
                clo_id: m.clo_id,
                marks_obtained: m.marks_obtained,
            })
            .collect()
    }
}
