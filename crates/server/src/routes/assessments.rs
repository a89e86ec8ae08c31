use crate::{
    auth::Caller,
    dtos::{
        ResponseEnvelope, TermQuery,
        assessment::{
            AllocateClosRequest, BulkMarksRequest, CreateAssessmentRequest,
            UpdateAssessmentRequest,
        },
    },
    error::{ApiResponse, ApiResult},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use database::{
    entities::{assessment, assessment_clo, clo},
    services::{
        allocation::{AllocationService, AssessmentAllocations},
        assessment::{
            AssessmentDetail, AssessmentService, AvailableMarks, CourseAssessments,
            CreatedAssessment, FinalizationStatus, FinalizedAssessment,
        },
        marks::{AssessmentMarks, BulkEntryResult, MarksService, StudentBrief, StudentMarks},
    },
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assessment))
        .route("/course/{course_id}", get(course_assessments))
        .route("/course/{course_id}/available-marks", get(available_marks))
        .route("/course/{course_id}/clos", get(course_clos))
        .route("/course/{course_id}/students", get(course_students))
        .route(
            "/{id}",
            get(get_assessment)
                .put(update_assessment)
                .delete(delete_assessment),
        )
        .route("/{id}/clos", get(assessment_clos).put(allocate_clos))
        .route("/{id}/marks", get(assessment_marks).post(enter_marks))
        .route("/{id}/marks/{student_id}", get(student_marks))
        .route(
            "/{id}/finalize",
            post(finalize_marks).delete(unfinalize_marks),
        )
        .route("/{id}/finalization-status", get(finalization_status))
}

/// Create an assessment within the course's marks cap
#[utoipa::path(
    post,
    path = "/api/assessments",
    request_body = CreateAssessmentRequest,
    responses(
        (status = 201, description = "Assessment created", body = ResponseEnvelope),
        (status = 400, description = "Marks cap exceeded, duplicate practical or invalid input", body = ResponseEnvelope),
        (status = 403, description = "Not assigned to the course in this term", body = ResponseEnvelope),
        (status = 404, description = "Course or faculty profile not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn create_assessment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CreateAssessmentRequest>,
) -> ApiResult<CreatedAssessment> {
    let created = AssessmentService::create(&state.db, &caller, req.into()).await?;
    Ok(ApiResponse::created(created).with_message("Assessment created successfully"))
}

/// List a course's active assessments with the marks-cap summary
#[utoipa::path(
    get,
    path = "/api/assessments/course/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID"), TermQuery),
    responses(
        (status = 200, description = "Assessments for the course", body = ResponseEnvelope),
        (status = 404, description = "Course not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn course_assessments(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Query(query): Query<TermQuery>,
) -> ApiResult<CourseAssessments> {
    let listing =
        AssessmentService::list_for_course(&state.db, &caller, course_id, query.term()?).await?;
    Ok(ApiResponse::ok(listing))
}

/// Marks still available under the course cap
#[utoipa::path(
    get,
    path = "/api/assessments/course/{course_id}/available-marks",
    params(("course_id" = Uuid, Path, description = "Course ID"), TermQuery),
    responses(
        (status = 200, description = "Cap usage for the term", body = ResponseEnvelope),
        (status = 403, description = "Not assigned to the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn available_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Query(query): Query<TermQuery>,
) -> ApiResult<AvailableMarks> {
    let available =
        AssessmentService::available_marks(&state.db, &caller, course_id, query.term()?).await?;
    Ok(ApiResponse::ok(available))
}

/// Active CLOs of a course the caller teaches
#[utoipa::path(
    get,
    path = "/api/assessments/course/{course_id}/clos",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Active CLOs in display order", body = ResponseEnvelope),
        (status = 403, description = "Not assigned to the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn course_clos(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<clo::Model>> {
    let clos = AllocationService::course_clos(&state.db, &caller, course_id).await?;
    Ok(ApiResponse::ok(clos))
}

/// Enrolled students of a course, ordered by roll number
#[utoipa::path(
    get,
    path = "/api/assessments/course/{course_id}/students",
    params(("course_id" = Uuid, Path, description = "Course ID"), TermQuery),
    responses(
        (status = 200, description = "Enrolled roster", body = ResponseEnvelope),
        (status = 403, description = "Not assigned to the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Marks"
)]
pub async fn course_students(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Query(query): Query<TermQuery>,
) -> ApiResult<Vec<StudentBrief>> {
    let students =
        MarksService::course_students(&state.db, &caller, course_id, query.term()?).await?;
    Ok(ApiResponse::ok(students))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Assessment with allocations and mark count", body = ResponseEnvelope),
        (status = 403, description = "Neither creator nor assigned faculty", body = ResponseEnvelope),
        (status = 404, description = "Assessment not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn get_assessment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<AssessmentDetail> {
    Ok(ApiResponse::ok(
        AssessmentService::get(&state.db, &caller, id).await?,
    ))
}

/// Update an assessment; once marks exist only description and dates change
#[utoipa::path(
    put,
    path = "/api/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    request_body = UpdateAssessmentRequest,
    responses(
        (status = 200, description = "Assessment updated", body = ResponseEnvelope),
        (status = 400, description = "Locked by marks, cap exceeded or allocation mismatch", body = ResponseEnvelope),
        (status = 403, description = "Not the creator", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn update_assessment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAssessmentRequest>,
) -> ApiResult<assessment::Model> {
    let updated = AssessmentService::update(&state.db, &caller, id, req.into()).await?;
    Ok(ApiResponse::ok(updated).with_message("Assessment updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/assessments/{id}",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Assessment deleted", body = ResponseEnvelope),
        (status = 400, description = "Marks already entered", body = ResponseEnvelope),
        (status = 403, description = "Not the creator", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn delete_assessment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    AssessmentService::delete(&state.db, &caller, id).await?;
    Ok(ApiResponse::message("Assessment deleted successfully"))
}

/// Every active course CLO with its allocation in this assessment
#[utoipa::path(
    get,
    path = "/api/assessments/{id}/clos",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "CLO allocations", body = ResponseEnvelope),
        (status = 403, description = "Not the creator", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Allocations"
)]
pub async fn assessment_clos(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<AssessmentAllocations> {
    Ok(ApiResponse::ok(
        AllocationService::get(&state.db, &caller, id).await?,
    ))
}

/// Replace the CLO allocations; they must sum to the assessment's max marks
#[utoipa::path(
    put,
    path = "/api/assessments/{id}/clos",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    request_body = AllocateClosRequest,
    responses(
        (status = 200, description = "Allocations replaced", body = ResponseEnvelope),
        (status = 400, description = "Mismatched total, foreign CLOs or locked by marks", body = ResponseEnvelope),
        (status = 403, description = "Not the creator", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Allocations"
)]
pub async fn allocate_clos(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<AllocateClosRequest>,
) -> ApiResult<Vec<assessment_clo::Model>> {
    let rows = AllocationService::replace(&state.db, &caller, id, req.into_inputs()).await?;
    Ok(ApiResponse::ok(rows).with_message("CLO allocations saved successfully"))
}

/// Marks per enrolled student with statistics
#[utoipa::path(
    get,
    path = "/api/assessments/{id}/marks",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Mark sheet", body = ResponseEnvelope),
        (status = 403, description = "Neither creator nor assigned faculty", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Marks"
)]
pub async fn assessment_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<AssessmentMarks> {
    Ok(ApiResponse::ok(
        MarksService::assessment_marks(&state.db, &caller, id).await?,
    ))
}

/// Upsert marks; valid entries are saved even when others are rejected
#[utoipa::path(
    post,
    path = "/api/assessments/{id}/marks",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    request_body = BulkMarksRequest,
    responses(
        (status = 200, description = "Saved entries and per-entry errors", body = ResponseEnvelope),
        (status = 400, description = "Marks finalized or every entry invalid", body = ResponseEnvelope),
        (status = 403, description = "Neither creator nor assigned faculty", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Marks"
)]
pub async fn enter_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<BulkMarksRequest>,
) -> ApiResult<BulkEntryResult> {
    let result = MarksService::enter_bulk(&state.db, &caller, id, req.into_entries()).await?;
    let message = format!(
        "{} mark(s) saved, {} rejected",
        result.success_count, result.error_count
    );
    Ok(ApiResponse::ok(result).with_message(message))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}/marks/{student_id}",
    params(
        ("id" = Uuid, Path, description = "Assessment ID"),
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "One student's marks per CLO", body = ResponseEnvelope),
        (status = 404, description = "Assessment or student not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Marks"
)]
pub async fn student_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StudentMarks> {
    Ok(ApiResponse::ok(
        MarksService::student_marks(&state.db, &caller, id, student_id).await?,
    ))
}

/// Lock the assessment's marks
#[utoipa::path(
    post,
    path = "/api/assessments/{id}/finalize",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Marks finalized", body = ResponseEnvelope),
        (status = 400, description = "Already finalized or invalid marks present", body = ResponseEnvelope),
        (status = 403, description = "Not the creator", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn finalize_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<FinalizedAssessment> {
    let finalized = AssessmentService::finalize(&state.db, &caller, id).await?;
    Ok(ApiResponse::ok(finalized).with_message("Marks finalized successfully"))
}

/// Reopen finalized marks; only the creator who finalized them
#[utoipa::path(
    delete,
    path = "/api/assessments/{id}/finalize",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Marks unlocked", body = ResponseEnvelope),
        (status = 400, description = "Not finalized", body = ResponseEnvelope),
        (status = 403, description = "Not the finalizing creator", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn unfinalize_marks(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<assessment::Model> {
    let reopened = AssessmentService::unfinalize(&state.db, &caller, id).await?;
    Ok(ApiResponse::ok(reopened).with_message("Marks unlocked for editing"))
}

#[utoipa::path(
    get,
    path = "/api/assessments/{id}/finalization-status",
    params(("id" = Uuid, Path, description = "Assessment ID")),
    responses(
        (status = 200, description = "Lock state and entry progress", body = ResponseEnvelope),
        (status = 403, description = "Neither creator nor assigned faculty", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assessments"
)]
pub async fn finalization_status(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> ApiResult<FinalizationStatus> {
    Ok(ApiResponse::ok(
        AssessmentService::finalization_status(&state.db, &caller, id).await?,
    ))
}
