use crate::{
    auth::Caller,
    dtos::{
        RequiredTermQuery, ResponseEnvelope,
        validation::{ValidateAssessmentRequest, ValidateMarksRequest},
    },
    error::{ApiResponse, ApiResult},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use database::services::validation::{
    AssessmentVerdict, MarkVerdict, PracticalCheck, ValidationService,
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/course/{course_id}/has-practical", get(has_practical))
        .route("/assessment", post(validate_assessment))
        .route("/marks", post(validate_marks))
}

/// Whether the course already has an active practical in the term
#[utoipa::path(
    get,
    path = "/api/validation/course/{course_id}/has-practical",
    params(("course_id" = Uuid, Path, description = "Course ID"), RequiredTermQuery),
    responses(
        (status = 200, description = "Practical lookup", body = ResponseEnvelope),
        (status = 403, description = "Not assigned to the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Validation"
)]
pub async fn has_practical(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Query(term): Query<RequiredTermQuery>,
) -> ApiResult<PracticalCheck> {
    let check =
        ValidationService::has_practical(&state.db, &caller, course_id, term.into()).await?;
    Ok(ApiResponse::ok(check))
}

/// Dry-run an assessment against the marks cap and practical rule
#[utoipa::path(
    post,
    path = "/api/validation/assessment",
    request_body = ValidateAssessmentRequest,
    responses(
        (status = 200, description = "Verdict; nothing is written", body = ResponseEnvelope),
        (status = 403, description = "Not assigned to the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Validation"
)]
pub async fn validate_assessment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<ValidateAssessmentRequest>,
) -> ApiResult<AssessmentVerdict> {
    let verdict = ValidationService::validate_assessment(&state.db, &caller, req.into()).await?;
    Ok(ApiResponse::ok(verdict))
}

/// Dry-run a single mark against its CLO allocation
#[utoipa::path(
    post,
    path = "/api/validation/marks",
    request_body = ValidateMarksRequest,
    responses(
        (status = 200, description = "Verdict; nothing is written", body = ResponseEnvelope),
        (status = 400, description = "CLO not allocated to the assessment", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Validation"
)]
pub async fn validate_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<ValidateMarksRequest>,
) -> ApiResult<MarkVerdict> {
    let verdict = ValidationService::validate_marks(&state.db, &caller, req.into()).await?;
    Ok(ApiResponse::ok(verdict))
}
