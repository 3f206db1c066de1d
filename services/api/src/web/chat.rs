//! services/api/src/web/chat.rs
//!
//! The chat endpoint: hands the request to the core relay and renders the result.

use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use relay_core::{AttachmentDescriptor, ChatRequest, ChatResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// A client-supplied attachment reference. Every field is optional and unverified.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AttachmentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The request body for `POST /api/chat`. Needs `text`, `attachments`, or both.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ChatPayload {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Option<Vec<AttachmentPayload>>,
}

/// The model's reply plus the attachments as the client sent them.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    pub reply: String,
    pub attachments: Vec<AttachmentPayload>,
}

impl From<AttachmentPayload> for AttachmentDescriptor {
    fn from(a: AttachmentPayload) -> Self {
        Self {
            name: a.name,
            mime_type: a.mime_type,
            url: a.url,
        }
    }
}

impl From<AttachmentDescriptor> for AttachmentPayload {
    fn from(a: AttachmentDescriptor) -> Self {
        Self {
            name: a.name,
            mime_type: a.mime_type,
            url: a.url,
        }
    }
}

impl From<ChatPayload> for ChatRequest {
    fn from(payload: ChatPayload) -> Self {
        Self {
            text: payload.text,
            attachments: payload
                .attachments
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            reply: response.reply,
            attachments: response.attachments.into_iter().map(Into::into).collect(),
        }
    }
}

//=========================================================================================
// Handler
//=========================================================================================

/// Relay a chat message to the completion service.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatPayload,
    responses(
        (status = 200, description = "Model reply", body = ChatReply),
        (status = 400, description = "Missing text and attachments, or no upstream credential configured", body = crate::error::ErrorBody),
        (status = 502, description = "Completion service failed; `detail` carries its raw response", body = crate::error::ErrorBody)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatPayload>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    let request = ChatRequest::from(payload);
    let attachment_count = request.attachments.len();

    let response = state.relay.relay(request).await?;
    info!(attachments = attachment_count, reply_chars = response.reply.len(), "Chat relayed");

    Ok(Json(response.into()))
}
