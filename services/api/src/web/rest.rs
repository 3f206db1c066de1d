//! services/api/src/web/rest.rs
//!
//! Small REST handlers and the master definition for the OpenAPI specification.

use crate::error::ErrorBody;
use crate::web::chat::{AttachmentPayload, ChatPayload, ChatReply};
use crate::web::upload::UploadResponse;
use axum::response::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::upload::upload_handler,
        crate::web::chat::chat_handler,
        health_handler,
    ),
    components(
        schemas(UploadResponse, ChatPayload, AttachmentPayload, ChatReply, ErrorBody, HealthResponse)
    ),
    tags(
        (name = "Attachment Relay API", description = "File uploads and chat relay to a completion service.")
    )
)]
pub struct ApiDoc;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
