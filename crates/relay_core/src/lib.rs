pub mod domain;
pub mod naming;
pub mod ports;
pub mod prompt;
pub mod relay;

pub use domain::{AttachmentDescriptor, ChatMessage, ChatRequest, ChatResponse, CompletionRequest, Role, UploadedFile};
pub use naming::{generate_name, MAX_UPLOAD_BYTES};
pub use ports::{CompletionService, CredentialSource, PortError, PortResult};
pub use relay::{ChatRelay, RelayError, NO_REPLY};
