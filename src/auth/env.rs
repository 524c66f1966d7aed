//! API key from the environment

use crate::auth::{AuthSource, CredentialProvider};
use crate::error::{Error, Result};
use crate::types::Credential;
use tracing::debug;

/// Environment variable holding the UTS API key
pub const UTS_API_KEY_VAR: &str = "UTS_API_KEY";

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads the API key from `UTS_API_KEY`
pub struct EnvCredentials {
    lookup: Lookup,
}

impl EnvCredentials {
    /// Read from the process environment
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read through a custom lookup function
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentials {
    fn obtain(&self) -> Result<Credential> {
        debug!("checking {UTS_API_KEY_VAR} env var");
        match (self.lookup)(UTS_API_KEY_VAR) {
            Some(key) if !key.trim().is_empty() => {
                debug!("obtained API key from {UTS_API_KEY_VAR} env var");
                Ok(Credential::ApiKey(key.trim().to_string()))
            }
            _ => Err(Error::Auth(format!(
                "No UTS API key found. Get one from your UTS profile at https://uts.nlm.nih.gov and set {UTS_API_KEY_VAR}"
            ))),
        }
    }

    fn source(&self) -> AuthSource {
        AuthSource::EnvVar
    }
}
