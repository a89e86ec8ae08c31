pub mod assessments;
pub mod assignments;
pub mod faculty;
pub mod health;
pub mod hod;
pub mod root;
pub mod validation;

use crate::state::AppState;
use axum::Router;

/// Every route that requires a verified bearer token, relative to `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/assessments", assessments::router())
        .nest("/validation", validation::router())
        .nest("/assignments", assignments::router())
        .nest("/faculty", faculty::router())
        .nest("/hod", hod::router())
}
