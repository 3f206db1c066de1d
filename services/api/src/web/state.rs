//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::UploadDir;
use relay_core::ChatRelay;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadDir,
    pub max_upload_bytes: u64,
    /// Fixed origin for upload URLs; `None` reflects the request's scheme and Host.
    pub public_base_url: Option<String>,
    pub relay: ChatRelay,
}
