use crate::{
    auth::Caller,
    dtos::ResponseEnvelope,
    error::{ApiResponse, ApiResult},
    state::AppState,
};
use axum::{
    Router,
    extract::State,
    routing::get,
};
use database::services::faculty::{
    CurrentAssignments, FacultyProfile, FacultyService, TeachingAssignment,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route("/assignments", get(all_assignments))
        .route("/assignments/current", get(current_assignments))
}

/// The caller's faculty profile with every assignment
#[utoipa::path(
    get,
    path = "/api/faculty/profile",
    responses(
        (status = 200, description = "Faculty profile", body = ResponseEnvelope),
        (status = 404, description = "No faculty profile for this user", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Faculty"
)]
pub async fn profile(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<FacultyProfile> {
    Ok(ApiResponse::ok(
        FacultyService::profile(&state.db, &caller).await?,
    ))
}

/// Assignments for the term containing today, with each course's CLOs
#[utoipa::path(
    get,
    path = "/api/faculty/assignments/current",
    responses(
        (status = 200, description = "Current-term assignments", body = ResponseEnvelope),
        (status = 404, description = "No faculty profile for this user", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Faculty"
)]
pub async fn current_assignments(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<CurrentAssignments> {
    Ok(ApiResponse::ok(
        FacultyService::current_assignments(&state.db, &caller).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/faculty/assignments",
    responses(
        (status = 200, description = "Every assignment, newest year first", body = ResponseEnvelope),
        (status = 404, description = "No faculty profile for this user", body = ResponseEnvelope)
    ),
    security(("jwt" = [])),
    tag = "Faculty"
)]
pub async fn all_assignments(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Vec<TeachingAssignment>> {
    Ok(ApiResponse::ok(
        FacultyService::all_assignments(&state.db, &caller).await?,
    ))
}
