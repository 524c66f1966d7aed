//! Progress callback trait for interface-agnostic updates
//!
//! Lets a frontend (CLI spinner, log sink) follow a submission as it moves
//! through its states.

use crate::error::Error;
use async_trait::async_trait;

/// State of a submission call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Email address checked
    Validated,
    /// Fresh service ticket in hand
    TicketReady,
    /// Request posted, response received
    Posted,
    /// Scheduler answered 302; the identical request was posted again
    RedirectRetried,
    /// Result text returned to the caller
    Completed,
    /// The call ended with an error
    Failed,
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Preparing job"),
            Self::Validated => write!(f, "Checking ticket"),
            Self::TicketReady => write!(f, "Submitting job"),
            Self::Posted => write!(f, "Waiting for results"),
            Self::RedirectRetried => write!(f, "Resubmitting after redirect"),
            Self::Completed => write!(f, "Done"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive state changes during submission.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called on every state transition
    async fn on_state(&self, state: SubmissionState);

    /// Called with the error that ends a failed submission
    async fn on_error(&self, error: &Error);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_state(&self, _state: SubmissionState) {}
    async fn on_error(&self, _error: &Error) {}
}
