//! Common test utilities for skr-client tests

// Not all test binaries use all helpers
#![allow(dead_code)]

use async_trait::async_trait;
use skr_client::config::ClientConfig;
use skr_client::error::{Error, Result};
use skr_client::form::{FormState, fields};
use skr_client::submit::{ProgressCallback, SubmissionState};
use skr_client::ticket::TicketGranter;
use skr_client::types::{Credential, RunProg};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Granter issuing `ST-1`, `ST-2`, ... and counting requests
#[derive(Clone, Default)]
pub struct CountingGranter {
    calls: Arc<AtomicUsize>,
}

impl CountingGranter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tickets granted so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketGranter for CountingGranter {
    async fn grant(&self, _credential: &Credential, _service_url: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("ST-{n}"))
    }
}

/// Granter that always refuses
pub struct RejectingGranter;

#[async_trait]
impl TicketGranter for RejectingGranter {
    async fn grant(&self, _credential: &Credential, _service_url: &str) -> Result<String> {
        Err(Error::Auth("credential rejected".to_string()))
    }
}

/// Granter that issues one ticket and then refuses
#[derive(Clone, Default)]
pub struct OneShotGranter {
    calls: Arc<AtomicUsize>,
}

impl OneShotGranter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketGranter for OneShotGranter {
    async fn grant(&self, _credential: &Credential, _service_url: &str) -> Result<String> {
        match self.calls.fetch_add(1, Ordering::SeqCst) {
            0 => Ok("ST-1".to_string()),
            _ => Err(Error::Auth("ticket-granting ticket expired".to_string())),
        }
    }
}

/// Records every state a submission passes through
#[derive(Clone, Default)]
pub struct RecordingProgress {
    states: Arc<Mutex<Vec<SubmissionState>>>,
    errors: Arc<AtomicUsize>,
}

impl RecordingProgress {
    pub fn states(&self) -> Vec<SubmissionState> {
        self.states.lock().unwrap().clone()
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_state(&self, state: SubmissionState) {
        self.states.lock().unwrap().push(state);
    }

    async fn on_error(&self, _error: &Error) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }
}

/// Config pointing every endpoint at a mock server
pub fn mock_config(server_url: &str, ticket_timeout_secs: u64) -> ClientConfig {
    ClientConfig {
        cas_tgt_url: format!("{server_url}/cas/v1/api-key"),
        cas_auth_url: format!("{server_url}/cas/v1/tickets"),
        batch_url: format!("{server_url}/batch"),
        metamap_url: format!("{server_url}/mm"),
        semrep_url: format!("{server_url}/sr"),
        mti_url: format!("{server_url}/mti"),
        ticket_timeout_secs,
        ..ClientConfig::default()
    }
}

/// Base URL of a port nothing listens on
pub const REFUSED_URL: &str = "http://127.0.0.1:1";

/// Batch form with an in-memory upload
pub fn batch_form(email: Option<&str>) -> FormState {
    let mut form = FormState::new(RunProg::GenericValidated);
    if let Some(email) = email {
        form.set_text(fields::EMAIL_ADDRESS, email);
    }
    form.set_text(fields::BATCH_COMMAND, "metamap -% format -E")
        .set_file_from_buffer(fields::UPLOAD_FILE, "sample.txt", "PMID- 123\nTI  - Heart attack\n");
    form
}
