//! Batch command - submit a generic batch job

use crate::cli::{GlobalOptions, submit_and_print};
use skr_client::error::{Error, Result};
use skr_client::form::{FormState, fields};
use skr_client::types::{RunProg, ServiceTarget};
use std::path::Path;

/// Options for the batch command
#[derive(Debug, Clone, Default)]
pub struct BatchOptions<'a> {
    /// Submitter's email address
    pub email: Option<&'a str>,
    /// Command the scheduler runs
    pub command: &'a str,
    /// `#`-separated environment for the command
    pub env: Option<&'a str>,
    /// Notes attached to the job
    pub note: &'a str,
    /// Don't send an email when the job completes
    pub silent: bool,
    /// Skip end-of-result validation
    pub no_validation: bool,
}

/// Build the form for a batch job
pub fn build_batch_form(input: &Path, options: &BatchOptions<'_>) -> Result<FormState> {
    if !input.is_file() {
        return Err(Error::InvalidArgument(format!(
            "input file not found: {}",
            input.display()
        )));
    }

    let run_prog = if options.no_validation {
        RunProg::Generic
    } else {
        RunProg::GenericValidated
    };

    let mut form = FormState::new(run_prog);
    if let Some(email) = options.email {
        form.set_text(fields::EMAIL_ADDRESS, email);
    }
    form.set_file(fields::UPLOAD_FILE, input)
        .set_text(fields::BATCH_COMMAND, options.command)
        .set_text(fields::BATCH_NOTES, options.note)
        .set_bool(fields::SILENT_EMAIL, options.silent);
    if let Some(env) = options.env {
        form.set_text(fields::BATCH_ENV, env);
    }
    Ok(form)
}

/// Run the batch command
pub async fn run_batch(
    input: &Path,
    options: BatchOptions<'_>,
    global: &GlobalOptions<'_>,
) -> Result<()> {
    let form = build_batch_form(input, &options)?;
    submit_and_print(&form, ServiceTarget::BatchValidation, global).await
}
