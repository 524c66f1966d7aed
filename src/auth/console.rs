//! Terminal credential prompt

use crate::auth::{AuthSource, CredentialProvider};
use crate::error::{Error, Result};
use crate::types::Credential;
use dialoguer::{Input, Password};
use tracing::debug;

/// What the prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// A UTS API key
    #[default]
    ApiKey,
    /// A username followed by a password
    UserPassword,
}

/// Prompts on the controlling terminal; secrets are not echoed
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompt {
    mode: PromptMode,
}

impl ConsolePrompt {
    /// Create a prompt for the given mode
    pub const fn new(mode: PromptMode) -> Self {
        Self { mode }
    }
}

impl CredentialProvider for ConsolePrompt {
    fn obtain(&self) -> Result<Credential> {
        debug!(mode = ?self.mode, "prompting for credentials");
        match self.mode {
            PromptMode::ApiKey => {
                let key = Password::new()
                    .with_prompt("Enter your UTS API key")
                    .interact()
                    .map_err(|e| Error::Auth(format!("failed to read API key: {e}")))?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(Error::Auth("API key is empty".to_string()));
                }
                Ok(Credential::ApiKey(key.to_string()))
            }
            PromptMode::UserPassword => {
                let username = Input::<String>::new()
                    .with_prompt("Enter your Username")
                    .interact_text()
                    .map_err(|e| Error::Auth(format!("failed to read username: {e}")))?;
                let password = Password::new()
                    .with_prompt("Enter your password")
                    .interact()
                    .map_err(|e| Error::Auth(format!("failed to read password: {e}")))?;
                if password.is_empty() {
                    return Err(Error::Auth("password is empty".to_string()));
                }
                Ok(Credential::UserPassword {
                    username: username.trim().to_string(),
                    password,
                })
            }
        }
    }

    fn source(&self) -> AuthSource {
        AuthSource::Prompt
    }
}
