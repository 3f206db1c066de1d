pub mod completion;
pub mod credentials;
pub mod upload_dir;

pub use completion::OpenAiCompletionAdapter;
pub use credentials::{EnvCredentials, StaticCredentials};
pub use upload_dir::{StagedUpload, UploadDir};
