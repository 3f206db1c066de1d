//! crates/relay_core/src/ports.rs
//!
//! Defines the service contracts (traits) the relay depends on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of the HTTP client and of where credentials come from.

use crate::domain::CompletionRequest;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The upstream service answered with a non-success status.
    #[error("Upstream returned status {status}")]
    Upstream { status: u16, body: String },
    /// The call never produced a usable HTTP response (connect failure, timeout, bad body).
    #[error("Upstream transport failure: {0}")]
    Transport(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one completion request. `Ok(None)` means the upstream call succeeded
    /// but the body carried no first-choice message content.
    async fn complete(&self, api_key: &str, request: &CompletionRequest) -> PortResult<Option<String>>;
}

/// Supplies the upstream credential. Consulted on every chat request.
pub trait CredentialSource: Send + Sync {
    fn api_key(&self) -> Option<String>;
}
