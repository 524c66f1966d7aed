//! Spinner-backed progress callback

use crate::cli::style::spinner_style;
use async_trait::async_trait;
use indicatif::ProgressBar;
use skr_client::error::Error;
use skr_client::submit::{ProgressCallback, SubmissionState};
use std::time::Duration;

/// Shows the current submission state on a stderr spinner
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner
    pub fn start() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_state(&self, state: SubmissionState) {
        match state {
            SubmissionState::Completed | SubmissionState::Failed => {
                self.spinner.finish_and_clear();
            }
            _ => self.spinner.set_message(format!("{state}...")),
        }
    }

    async fn on_error(&self, _error: &Error) {
        // main reports the error once the spinner is gone
        self.spinner.finish_and_clear();
    }
}
