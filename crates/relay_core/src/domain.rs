//! crates/relay_core/src/domain.rs
//!
//! Defines the pure, core data structures for the relay.
//! These structs are independent of any HTTP framework or serialization format.

use std::path::PathBuf;

/// A file persisted by the upload path. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub generated_name: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub storage_path: PathBuf,
    pub public_url: String,
}

/// Client-supplied reference to a file. Nothing here is verified by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentDescriptor {
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub url: Option<String>,
}

/// A single chat turn as received from a client.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub text: Option<String>,
    pub attachments: Vec<AttachmentDescriptor>,
}

impl ChatRequest {
    /// True when the request has neither text nor attachments.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty) && self.attachments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the conversation sent upstream. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Everything the completion service needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// The relay's answer, echoing the caller's attachments in their original order.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub reply: String,
    pub attachments: Vec<AttachmentDescriptor>,
}
