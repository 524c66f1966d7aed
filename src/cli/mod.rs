//! CLI commands

mod auth;
mod batch;
mod interactive;
mod progress;
mod style;

pub use auth::run_auth;
pub use batch::{BatchOptions, run_batch};
pub use interactive::{InteractiveOptions, run_interactive};
pub use progress::CliProgress;

use skr_client::auth::{CredentialProvider, credential_provider_from_config};
use skr_client::config::{ClientConfig, CredentialSelection};
use skr_client::error::Result;
use skr_client::form::FormState;
use skr_client::submit::SubmissionClient;
use skr_client::types::ServiceTarget;
use skr_client::validate;
use std::path::Path;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions<'a> {
    /// Config file to load instead of the default location
    pub config: Option<&'a Path>,
    /// API key given on the command line
    pub api_key: Option<&'a str>,
    /// Credential provider override
    pub credentials: Option<&'a str>,
}

/// Load configuration and apply command-line overrides
pub fn load_config(options: &GlobalOptions<'_>) -> Result<ClientConfig> {
    let mut config =
        ClientConfig::load(options.config)?.apply_env(|key| std::env::var(key).ok())?;

    if let Some(selection) = options.credentials {
        config.credentials = selection.parse()?;
    } else if options.api_key.is_some() {
        config.credentials = CredentialSelection::ApiKey;
    }

    config.validate()?;
    Ok(config)
}

/// Credential provider for the loaded configuration
pub fn credentials(
    config: &ClientConfig,
    options: &GlobalOptions<'_>,
) -> Result<Box<dyn CredentialProvider>> {
    credential_provider_from_config(config.credentials, options.api_key)
}

/// Validate `form`, connect to `target`, submit and print the result
///
/// The email check runs before any credential prompt or network traffic.
async fn submit_and_print(
    form: &FormState,
    target: ServiceTarget,
    options: &GlobalOptions<'_>,
) -> Result<()> {
    validate::check(form)?;

    let config = load_config(options)?;
    let provider = credentials(&config, options)?;
    let mut client = SubmissionClient::connect(config, target, provider.as_ref())
        .await?
        .with_progress(Box::new(CliProgress::start()));

    let result = client.submit(form).await?;
    print!("{result}");
    Ok(())
}
