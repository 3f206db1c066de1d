//! crates/relay_core/src/relay.rs
//!
//! The chat relay: validate, check the credential, compose, dispatch once, translate.

use crate::domain::{ChatRequest, ChatResponse, CompletionRequest};
use crate::ports::{CompletionService, CredentialSource, PortError};
use crate::prompt::build_messages;
use std::sync::Arc;

pub const MAX_OUTPUT_TOKENS: u32 = 800;
pub const TEMPERATURE: f32 = 0.2;

/// Returned as the reply when the upstream body has no first-choice content.
pub const NO_REPLY: &str = "No reply";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Configuration(String),
    #[error("Upstream completion request failed")]
    Upstream { detail: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PortError> for RelayError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Upstream { body, .. } => RelayError::Upstream { detail: body },
            PortError::Transport(detail) => RelayError::Upstream { detail },
            PortError::Unexpected(msg) => RelayError::Internal(msg),
        }
    }
}

#[derive(Clone)]
pub struct ChatRelay {
    completion: Arc<dyn CompletionService>,
    credentials: Arc<dyn CredentialSource>,
}

impl ChatRelay {
    pub fn new(completion: Arc<dyn CompletionService>, credentials: Arc<dyn CredentialSource>) -> Self {
        Self { completion, credentials }
    }

    /// Runs one chat request through to the completion service. Single attempt, no retries.
    pub async fn relay(&self, request: ChatRequest) -> Result<ChatResponse, RelayError> {
        if request.is_empty() {
            return Err(RelayError::Validation("Text or attachments are required".to_string()));
        }

        let api_key = self
            .credentials
            .api_key()
            .ok_or_else(|| RelayError::Configuration("Upstream API key is not configured".to_string()))?;

        let completion_request = CompletionRequest {
            messages: build_messages(request.text.as_deref(), &request.attachments),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let reply = self
            .completion
            .complete(&api_key, &completion_request)
            .await?
            .unwrap_or_else(|| NO_REPLY.to_string());

        Ok(ChatResponse {
            reply,
            attachments: request.attachments,
        })
    }
}
