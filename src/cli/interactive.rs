//! Interactive command - run MetaMap, SemRep or MTI on a small text

use crate::cli::{GlobalOptions, submit_and_print};
use skr_client::error::{Error, Result};
use skr_client::form::{FormState, fields};
use skr_client::types::{RunProg, ServiceTarget};
use std::path::Path;
use tracing::warn;

/// The scheduler rejects interactive text longer than this
pub const MAX_API_TEXT_CHARS: usize = 10_000;

/// Default `COMMAND_ARGS` for interactive MTI
pub const DEFAULT_MTI_ARGS: &str = "-opt1L_DCMS";

/// Options for the interactive command
#[derive(Debug, Clone, Default)]
pub struct InteractiveOptions<'a> {
    /// Submitter's email address
    pub email: Option<&'a str>,
    /// Program arguments (`COMMAND_ARGS`)
    pub args: Option<&'a str>,
    /// Input text given directly instead of a file
    pub text: Option<&'a str>,
}

/// Build the form for an interactive job
pub fn build_interactive_form(
    target: ServiceTarget,
    input: Option<&Path>,
    options: &InteractiveOptions<'_>,
) -> Result<FormState> {
    let text = match (input, options.text) {
        (Some(path), None) => std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidArgument(format!("cannot read input {}: {e}", path.display()))
        })?,
        (None, Some(text)) => text.to_string(),
        (Some(_), Some(_)) => {
            return Err(Error::InvalidArgument(
                "give either an input file or --text, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(Error::InvalidArgument(
                "an input file or --text is required".to_string(),
            ));
        }
    };

    let chars = text.chars().count();
    if chars > MAX_API_TEXT_CHARS {
        warn!(
            chars,
            limit = MAX_API_TEXT_CHARS,
            "input exceeds the interactive limit; the scheduler will likely reject it"
        );
    }

    let mut form = FormState::new(RunProg::GenericValidated);
    form.set_text(fields::API_TEXT, text);
    if let Some(email) = options.email {
        form.set_text(fields::EMAIL_ADDRESS, email);
    }

    let args = options
        .args
        .or((target == ServiceTarget::InteractiveMti).then_some(DEFAULT_MTI_ARGS));
    if let Some(args) = args {
        form.set_text(fields::COMMAND_ARGS, args);
    }
    Ok(form)
}

/// Run the interactive command
pub async fn run_interactive(
    target: ServiceTarget,
    input: Option<&Path>,
    options: InteractiveOptions<'_>,
    global: &GlobalOptions<'_>,
) -> Result<()> {
    let form = build_interactive_form(target, input, &options)?;
    submit_and_print(&form, target, global).await
}
