use crate::{
    auth::Caller,
    dtos::{
        RequiredTermQuery, ResponseEnvelope, TermQuery,
        assignment::{AssignFacultyRequest, UpdateAssignmentRequest},
    },
    error::{ApiResponse, ApiResult},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use database::services::assignment::{
    AssignmentService, AssignmentView, AvailableFaculties, CourseAssignments, DepartmentFaculty,
};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faculties", get(department_faculties))
        .route(
            "/course/{course_id}",
            get(course_assignments).post(assign_faculty),
        )
        .route("/course/{course_id}/available", get(available_faculties))
        .route(
            "/course/{course_id}/faculty/{faculty_id}",
            put(update_assignment).delete(remove_assignment),
        )
}

/// Active faculties of the caller's department with their assignments
#[utoipa::path(
    get,
    path = "/api/assignments/faculties",
    responses(
        (status = 200, description = "Department faculties", body = ResponseEnvelope),
        (status = 403, description = "Not a HOD", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assignments"
)]
pub async fn department_faculties(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Vec<DepartmentFaculty>> {
    Ok(ApiResponse::ok(
        AssignmentService::department_faculties(&state.db, &caller).await?,
    ))
}

/// Department faculties not yet teaching the course in the term
#[utoipa::path(
    get,
    path = "/api/assignments/course/{course_id}/available",
    params(("course_id" = Uuid, Path, description = "Course ID"), TermQuery),
    responses(
        (status = 200, description = "Assignable faculties", body = ResponseEnvelope),
        (status = 403, description = "Not the HOD of the course's department", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assignments"
)]
pub async fn available_faculties(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Query(query): Query<TermQuery>,
) -> ApiResult<AvailableFaculties> {
    let available =
        AssignmentService::available_faculties(&state.db, &caller, course_id, query.term()?)
            .await?;
    Ok(ApiResponse::ok(available))
}

#[utoipa::path(
    get,
    path = "/api/assignments/course/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID"), TermQuery),
    responses(
        (status = 200, description = "Assignments of the course", body = ResponseEnvelope),
        (status = 403, description = "Not the HOD of the course's department", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assignments"
)]
pub async fn course_assignments(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Query(query): Query<TermQuery>,
) -> ApiResult<CourseAssignments> {
    let listing = AssignmentService::list_for_course(
        &state.db,
        &caller,
        course_id,
        query.semester,
        query.year,
    )
    .await?;
    Ok(ApiResponse::ok(listing))
}

/// Assign a department faculty to the course for a term
#[utoipa::path(
    post,
    path = "/api/assignments/course/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    request_body = AssignFacultyRequest,
    responses(
        (status = 201, description = "Faculty assigned", body = ResponseEnvelope),
        (status = 400, description = "Faculty belongs to another department", body = ResponseEnvelope),
        (status = 409, description = "Already assigned in this term", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assignments"
)]
pub async fn assign_faculty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Json(req): Json<AssignFacultyRequest>,
) -> ApiResult<AssignmentView> {
    let view = AssignmentService::assign(&state.db, &caller, course_id, req.into()).await?;
    Ok(ApiResponse::created(view).with_message("Faculty assigned successfully"))
}

/// Update methodology or mode; a HOD may also reassign to another faculty
#[utoipa::path(
    put,
    path = "/api/assignments/course/{course_id}/faculty/{faculty_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course ID"),
        ("faculty_id" = Uuid, Path, description = "Faculty ID")
    ),
    request_body = UpdateAssignmentRequest,
    responses(
        (status = 200, description = "Assignment updated", body = ResponseEnvelope),
        (status = 403, description = "Not permitted to change this assignment", body = ResponseEnvelope),
        (status = 409, description = "Target faculty already assigned", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assignments"
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((course_id, faculty_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> ApiResult<AssignmentView> {
    let (term, update) = req.into_parts();
    let view =
        AssignmentService::update(&state.db, &caller, course_id, faculty_id, term, update).await?;
    Ok(ApiResponse::ok(view).with_message("Assignment updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/assignments/course/{course_id}/faculty/{faculty_id}",
    params(
        ("course_id" = Uuid, Path, description = "Course ID"),
        ("faculty_id" = Uuid, Path, description = "Faculty ID"),
        RequiredTermQuery
    ),
    responses(
        (status = 200, description = "Assignment removed", body = ResponseEnvelope),
        (status = 404, description = "Assignment not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Assignments"
)]
pub async fn remove_assignment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((course_id, faculty_id)): Path<(Uuid, Uuid)>,
    Query(term): Query<RequiredTermQuery>,
) -> ApiResult<()> {
    AssignmentService::remove(&state.db, &caller, course_id, faculty_id, term.into()).await?;
    Ok(ApiResponse::message("Assignment removed successfully"))
}
