use crate::{error::ApiError, state::AppState};
use axum::{extract::FromRequestParts, http::request::Parts};
use database::{ServiceError, services::access::Principal};
use log::debug;
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// The authenticated caller behind a verified bearer token.
///
/// The token subject is the user id; inactive or unknown users are
/// rejected before any handler runs.
pub struct Caller(pub Principal);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let subject = parts
            .extensions
            .get::<DefaultClaims>()
            .and_then(|claims| claims.sub.as_deref())
            .ok_or(ServiceError::Unauthenticated)?;

        let user_id = Uuid::parse_str(subject).map_err(|_| {
            debug!("Token subject {subject} is not a user id");
            ServiceError::Unauthenticated
        })?;

        Ok(Self(Principal::resolve(&state.db, user_id).await?))
    }
}
