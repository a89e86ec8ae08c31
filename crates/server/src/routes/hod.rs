use crate::{
    auth::Caller,
    dtos::{
        ResponseEnvelope,
        course::{
            AssignmentListQuery, CourseListQuery, CreateCloRequest, CreateCourseRequest,
            MapOutcomesRequest, UpdateCloRequest, UpdateCourseRequest, WorkloadQuery,
        },
    },
    error::{ApiResponse, ApiResult},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use database::{
    entities::{clo, course, program},
    services::{
        course::{CourseDetail, CourseListing, CourseRemoval, CourseService},
        outcome_mapping::{
            AvailableOutcomes, CourseMappings, MappingReplacement, OutcomeMappingService,
        },
        stats::{
            AssignmentStats, DashboardStats, DepartmentAssignments, FacultyWorkload, StatsService,
        },
    },
};
use serde_json::{Value, json};
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(dashboard))
        .route("/programmes", get(programmes))
        .route("/programmes/{program_id}/auto-code", get(auto_code))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{course_id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/courses/{course_id}/clos", get(list_clos).post(create_clo))
        .route("/clos/{clo_id}", put(update_clo))
        .route("/courses/{course_id}/outcomes", get(available_outcomes))
        .route(
            "/courses/{course_id}/mappings",
            get(course_mappings).put(map_outcomes),
        )
        .route("/faculties/{faculty_id}/workload", get(faculty_workload))
        .route("/assignments", get(department_assignments))
        .route("/assignments/stats", get(assignment_stats))
}

/// Catalog counts for the caller's department
#[utoipa::path(
    get,
    path = "/api/hod/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard counts", body = ResponseEnvelope),
        (status = 403, description = "Not a HOD", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<DashboardStats> {
    Ok(ApiResponse::ok(
        StatsService::dashboard(&state.db, &caller).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/hod/programmes",
    responses(
        (status = 200, description = "Programmes visible to the caller", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn programmes(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Vec<program::Model>> {
    Ok(ApiResponse::ok(
        CourseService::programmes(&state.db, &caller).await?,
    ))
}

/// Next free course code in a programme
#[utoipa::path(
    get,
    path = "/api/hod/programmes/{program_id}/auto-code",
    params(("program_id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Suggested code, e.g. C007", body = ResponseEnvelope),
        (status = 404, description = "Program not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn auto_code(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(program_id): Path<Uuid>,
) -> ApiResult<Value> {
    let code = CourseService::auto_code(&state.db, &caller, program_id).await?;
    Ok(ApiResponse::ok(json!({ "code": code })))
}

#[utoipa::path(
    get,
    path = "/api/hod/courses",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Department courses with CLO and faculty counts", body = ResponseEnvelope),
        (status = 403, description = "Not a HOD", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<CourseListQuery>,
) -> ApiResult<Vec<CourseListing>> {
    Ok(ApiResponse::ok(
        CourseService::list(&state.db, &caller, query.program_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/hod/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = ResponseEnvelope),
        (status = 400, description = "Invalid type, category or credits", body = ResponseEnvelope),
        (status = 409, description = "Slug already taken", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn create_course(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CreateCourseRequest>,
) -> ApiResult<course::Model> {
    let created = CourseService::create(&state.db, &caller, req.into()).await?;
    Ok(ApiResponse::created(created).with_message("Course created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/hod/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with department, programme and CLOs", body = ResponseEnvelope),
        (status = 404, description = "Course not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
) -> ApiResult<CourseDetail> {
    Ok(ApiResponse::ok(
        CourseService::get(&state.db, &caller, course_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/hod/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = ResponseEnvelope),
        (status = 409, description = "Slug already taken", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Json(req): Json<UpdateCourseRequest>,
) -> ApiResult<course::Model> {
    let updated = CourseService::update(&state.db, &caller, course_id, req.into()).await?;
    Ok(ApiResponse::ok(updated).with_message("Course updated successfully"))
}

/// Delete a course with everything it owns; refused once marks exist
#[utoipa::path(
    delete,
    path = "/api/hod/courses/{course_id}",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course and owned rows deleted", body = ResponseEnvelope),
        (status = 400, description = "Marks recorded against the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
) -> ApiResult<CourseRemoval> {
    let removal = CourseService::delete(&state.db, &caller, course_id).await?;
    Ok(ApiResponse::ok(removal).with_message("Course deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/hod/courses/{course_id}/clos",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Active CLOs in display order", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn list_clos(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<clo::Model>> {
    Ok(ApiResponse::ok(
        CourseService::list_clos(&state.db, &caller, course_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/hod/courses/{course_id}/clos",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    request_body = CreateCloRequest,
    responses(
        (status = 201, description = "CLO created", body = ResponseEnvelope),
        (status = 400, description = "Threshold outside 0 to 100", body = ResponseEnvelope),
        (status = 409, description = "Code already used in the course", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn create_clo(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Json(req): Json<CreateCloRequest>,
) -> ApiResult<clo::Model> {
    let created = CourseService::create_clo(&state.db, &caller, course_id, req.into()).await?;
    Ok(ApiResponse::created(created).with_message("CLO created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/hod/clos/{clo_id}",
    params(("clo_id" = Uuid, Path, description = "CLO ID")),
    request_body = UpdateCloRequest,
    responses(
        (status = 200, description = "CLO updated", body = ResponseEnvelope),
        (status = 404, description = "CLO not found", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn update_clo(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(clo_id): Path<Uuid>,
    Json(req): Json<UpdateCloRequest>,
) -> ApiResult<clo::Model> {
    let updated = CourseService::update_clo(&state.db, &caller, clo_id, req.into()).await?;
    Ok(ApiResponse::ok(updated).with_message("CLO updated successfully"))
}

/// CLOs of the course with the POs and PSOs of its programme
#[utoipa::path(
    get,
    path = "/api/hod/courses/{course_id}/outcomes",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Mappable outcomes", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Outcome mapping"
)]
pub async fn available_outcomes(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
) -> ApiResult<AvailableOutcomes> {
    Ok(ApiResponse::ok(
        OutcomeMappingService::available_outcomes(&state.db, &caller, course_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/hod/courses/{course_id}/mappings",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "PO and PSO mappings of the course's CLOs", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Outcome mapping"
)]
pub async fn course_mappings(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
) -> ApiResult<CourseMappings> {
    Ok(ApiResponse::ok(
        OutcomeMappingService::mappings(&state.db, &caller, course_id).await?,
    ))
}

/// Replace every mapping of the CLOs named in the request
#[utoipa::path(
    put,
    path = "/api/hod/courses/{course_id}/mappings",
    params(("course_id" = Uuid, Path, description = "Course ID")),
    request_body = MapOutcomesRequest,
    responses(
        (status = 200, description = "Mappings replaced", body = ResponseEnvelope),
        (status = 400, description = "No valid mappings or foreign CLOs", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Outcome mapping"
)]
pub async fn map_outcomes(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(course_id): Path<Uuid>,
    Json(req): Json<MapOutcomesRequest>,
) -> ApiResult<MappingReplacement> {
    let (po_mappings, pso_mappings) = req.into_inputs();
    let replaced =
        OutcomeMappingService::replace(&state.db, &caller, course_id, po_mappings, pso_mappings)
            .await?;
    Ok(ApiResponse::ok(replaced).with_message("CLO mappings saved successfully"))
}

/// A faculty's teaching load grouped by term
#[utoipa::path(
    get,
    path = "/api/hod/faculties/{faculty_id}/workload",
    params(("faculty_id" = Uuid, Path, description = "Faculty ID"), WorkloadQuery),
    responses(
        (status = 200, description = "Workload by term", body = ResponseEnvelope),
        (status = 403, description = "Faculty outside the caller's department", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn faculty_workload(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(faculty_id): Path<Uuid>,
    Query(query): Query<WorkloadQuery>,
) -> ApiResult<FacultyWorkload> {
    let workload =
        StatsService::faculty_workload(&state.db, &caller, faculty_id, query.year).await?;
    Ok(ApiResponse::ok(workload))
}

#[utoipa::path(
    get,
    path = "/api/hod/assignments",
    params(AssignmentListQuery),
    responses(
        (status = 200, description = "Paginated department assignments", body = ResponseEnvelope),
        (status = 403, description = "Not a HOD", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn department_assignments(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<AssignmentListQuery>,
) -> ApiResult<DepartmentAssignments> {
    Ok(ApiResponse::ok(
        StatsService::department_assignments(&state.db, &caller, query.into()).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/hod/assignments/stats",
    responses(
        (status = 200, description = "Assignment totals and top faculties and courses", body = ResponseEnvelope),
        (status = 403, description = "Not a HOD", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "HOD"
)]
pub async fn assignment_stats(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<AssignmentStats> {
    Ok(ApiResponse::ok(
        StatsService::assignment_stats(&state.db, &caller).await?,
    ))
}
