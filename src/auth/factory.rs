//! Credential provider factory
//!
//! Maps the configured selection to a provider.

use crate::auth::{
    ApiKeyCredentials, ConsolePrompt, CredentialProvider, EnvCredentials, PromptMode,
};
use crate::config::CredentialSelection;
use crate::error::{Error, Result};

/// Create the credential provider named by `selection`
///
/// `api_key` is only consulted for [`CredentialSelection::ApiKey`].
pub fn credential_provider_from_config(
    selection: CredentialSelection,
    api_key: Option<&str>,
) -> Result<Box<dyn CredentialProvider>> {
    match selection {
        CredentialSelection::Console => Ok(Box::new(ConsolePrompt::new(PromptMode::ApiKey))),
        CredentialSelection::ConsolePassword => {
            Ok(Box::new(ConsolePrompt::new(PromptMode::UserPassword)))
        }
        CredentialSelection::Env => Ok(Box::new(EnvCredentials::new())),
        CredentialSelection::ApiKey => {
            let key = api_key.ok_or_else(|| {
                Error::Config("credentials = \"api-key\" requires an API key (--api-key)".to_string())
            })?;
            Ok(Box::new(ApiKeyCredentials::new(key)))
        }
    }
}
