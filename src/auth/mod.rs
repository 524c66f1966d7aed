//! Credential providers
//!
//! A provider produces the secret that is exchanged for service tickets:
//! a terminal prompt, values supplied inline by the caller, or the
//! `UTS_API_KEY` environment variable.

mod console;
mod env;
mod factory;
mod inline;

pub use console::{ConsolePrompt, PromptMode};
pub use env::{EnvCredentials, UTS_API_KEY_VAR};
pub use factory::credential_provider_from_config;
pub use inline::{ApiKeyCredentials, InlineCredentials};

use crate::error::Result;
use crate::types::Credential;

/// Source of a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Typed at a terminal prompt
    Prompt,
    /// Supplied by the calling program
    Inline,
    /// Read from an environment variable
    EnvVar,
}

/// Supplies the identity secret used to obtain tickets
///
/// Called once when a client is built; the credential is kept for ticket
/// refreshes.
pub trait CredentialProvider: Send + Sync {
    /// Produce a credential, or `Error::Auth` if none is available
    fn obtain(&self) -> Result<Credential>;

    /// Where credentials from this provider come from
    fn source(&self) -> AuthSource;
}
