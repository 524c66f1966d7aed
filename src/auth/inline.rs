//! Credentials supplied directly by the calling program

use crate::auth::{AuthSource, CredentialProvider};
use crate::error::{Error, Result};
use crate::types::Credential;

/// Username and password embedded by the caller
///
/// Keep these out of source code where possible; anyone reading the
/// program can read the password.
#[derive(Clone)]
pub struct InlineCredentials {
    username: String,
    password: String,
}

impl InlineCredentials {
    /// Wrap a username and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CredentialProvider for InlineCredentials {
    fn obtain(&self) -> Result<Credential> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::Auth(
                "username and password must both be provided".to_string(),
            ));
        }
        Ok(Credential::UserPassword {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    fn source(&self) -> AuthSource {
        AuthSource::Inline
    }
}

/// API key provided by the caller, bypassing any prompt
#[derive(Clone)]
pub struct ApiKeyCredentials {
    key: String,
}

impl ApiKeyCredentials {
    /// Wrap an API key
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl CredentialProvider for ApiKeyCredentials {
    fn obtain(&self) -> Result<Credential> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(Error::Auth("API key is empty".to_string()));
        }
        Ok(Credential::ApiKey(key.to_string()))
    }

    fn source(&self) -> AuthSource {
        AuthSource::Inline
    }
}
