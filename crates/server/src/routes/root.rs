use crate::{dtos::ResponseEnvelope, error::ApiResponse};
use serde_json::{Value, json};

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service name and version", body = ResponseEnvelope)
    ),
    tag = "Health"
)]
pub async fn root() -> ApiResponse<Value> {
    ApiResponse::ok(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui",
    }))
}
