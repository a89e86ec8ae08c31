use database::services::{
    course::{CloPatch, CoursePatch, NewClo, NewCourse},
    outcome_mapping::{PoMappingInput, PsoMappingInput},
    stats::AssignmentFilter,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub code: String,
    pub name: String,
    /// Generated from the name when omitted
    pub slug: Option<String>,
    pub semester: Option<i32>,
    pub credits: i32,
    /// THEORY, PRACTICAL or BOTH
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    /// MAD, VAC, SEC, CORE or VOCATIONAL
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(req: CreateCourseRequest) -> Self {
        Self {
            code: req.code,
            name: req.name,
            slug: req.slug,
            semester: req.semester,
            credits: req.credits,
            course_type: req.course_type,
            category: req.category,
            description: req.description,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub semester: Option<i32>,
    pub credits: Option<i32>,
    #[serde(rename = "type")]
    pub course_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateCourseRequest> for CoursePatch {
    fn from(req: UpdateCourseRequest) -> Self {
        Self {
            code: req.code,
            name: req.name,
            slug: req.slug,
            semester: req.semester,
            credits: req.credits,
            course_type: req.course_type,
            category: req.category,
            description: req.description,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCloRequest {
    pub code: String,
    pub statement: String,
    pub bloom_level: String,
    pub attainment_threshold: Option<f64>,
    pub order: Option<i32>,
    pub version: Option<i32>,
}

impl From<CreateCloRequest> for NewClo {
    fn from(req: CreateCloRequest) -> Self {
        Self {
            code: req.code,
            statement: req.statement,
            bloom_level: req.bloom_level,
            attainment_threshold: req.attainment_threshold,
            display_order: req.order,
            version: req.version,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCloRequest {
    pub code: Option<String>,
    pub statement: Option<String>,
    pub bloom_level: Option<String>,
    pub attainment_threshold: Option<f64>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdateCloRequest> for CloPatch {
    fn from(req: UpdateCloRequest) -> Self {
        Self {
            code: req.code,
            statement: req.statement,
            bloom_level: req.bloom_level,
            attainment_threshold: req.attainment_threshold,
            display_order: req.order,
            is_active: req.is_active,
        }
    }
}

/// Entries missing an id or with a level outside 0..=3 are ignored
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoMappingRequest {
    pub clo_id: Option<Uuid>,
    pub po_id: Option<Uuid>,
    pub level: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PsoMappingRequest {
    pub clo_id: Option<Uuid>,
    pub pso_id: Option<Uuid>,
    pub level: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapOutcomesRequest {
    #[serde(default)]
    pub po_mappings: Vec<PoMappingRequest>,
    #[serde(default)]
    pub pso_mappings: Vec<PsoMappingRequest>,
}

impl MapOutcomesRequest {
    pub fn into_inputs(self) -> (Vec<PoMappingInput>, Vec<PsoMappingInput>) {
        let pos = self
            .po_mappings
            .into_iter()
            .map(|m| PoMappingInput {
                clo_id: m.clo_id,
                po_id: m.po_id,
                level: m.level,
            })
            .collect();
        let psos = self
            .pso_mappings
            .into_iter()
            .map(|m| PsoMappingInput {
                clo_id: m.clo_id,
                pso_id: m.pso_id,
                level: m.level,
            })
            .collect();
        (pos, psos)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    pub program_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WorkloadQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssignmentListQuery {
    pub semester: Option<i32>,
    pub year: Option<i32>,
    pub faculty_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    /// 1-based, defaults to 1
    pub page: Option<u64>,
    /// Defaults to 20
    pub limit: Option<u64>,
}

impl From<AssignmentListQuery> for AssignmentFilter {
    fn from(query: AssignmentListQuery) -> Self {
        Self {
            semester: query.semester,
            year: query.year,
            faculty_id: query.faculty_id,
            course_id: query.course_id,
            page: query.page,
            limit: query.limit,
        }
    }
}
