use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::ServiceError;
use log::{debug, error};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::OnceLock;

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Sets whether unexpected store errors reveal their cause; first call wins
pub fn expose_details(expose: bool) {
    let _ = EXPOSE_DETAILS.set(expose);
}

/// The `{success, data?, message?, error?, details?}` body every route returns
#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// A successful response wrapped in the envelope
pub struct ApiResponse<T> {
    status: StatusCode,
    data: Option<T>,
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
            message: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A body with only a message, for operations that return nothing
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: true,
            data: self.data,
            message: self.message,
            error: None,
            details: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// A service rejection rendered with its HTTP status
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::FacultyProfileNotFound | ServiceError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Forbidden(_) | ServiceError::NotAssigned { .. } => StatusCode::FORBIDDEN,
            ServiceError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ApiError(err) = self;

        let (message, details) = match &err {
            ServiceError::Database(cause) => {
                error!("Unexpected database error: {cause}");
                let details = EXPOSE_DETAILS
                    .get()
                    .copied()
                    .unwrap_or(false)
                    .then(|| json!({ "cause": cause.to_string() }));
                ("Internal server error".to_string(), details)
            }
            _ => {
                debug!("Request rejected ({}): {err}", err.kind());
                (err.to_string(), err.details())
            }
        };

        let body = Envelope::<()> {
            success: false,
            data: None,
            message: Some(message),
            error: Some(err.kind()),
            details,
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
