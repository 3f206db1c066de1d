//! services/api/src/adapters/credentials.rs
//!
//! Implementations of the `CredentialSource` port.

use relay_core::ports::CredentialSource;

/// Reads the API key from an environment variable on every call, so rotating or
/// removing it takes effect without a restart.
#[derive(Clone, Debug)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok().filter(|key| !key.trim().is_empty())
    }
}

/// A fixed key, mostly useful in tests.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials(pub Option<String>);

impl CredentialSource for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}
