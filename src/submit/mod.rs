//! Job submission
//!
//! A [`SubmissionClient`] posts one [`FormState`] per call to the scheduler:
//! 1. Validation - the email precondition, before any network traffic
//! 2. Ticket - reuse or refresh the service ticket
//! 3. Post - multipart body to `service?ticket=...`, reposted once on 302
//! 4. Result - response lines minus the keep-alive sentinel

mod progress;

pub use progress::{NoopProgress, ProgressCallback, SubmissionState};

use crate::auth::CredentialProvider;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::form::{EncodedForm, FormState, multipart};
use crate::ticket::{CasTicketGranter, TicketGranter, TicketProvider};
use crate::types::{ServiceTarget, Ticket};
use crate::validate;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

/// User agent sent with submissions; the scheduler expects a browser
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 Firefox/26.0";

/// Prefix of the keep-alive lines the scheduler emits while a job runs
pub const SENTINEL_PREFIX: &str = "NOT DONE LOOP";

/// Client submitting jobs to one scheduler target
pub struct SubmissionClient {
    config: ClientConfig,
    target: ServiceTarget,
    tickets: TicketProvider,
    ticket: Ticket,
    state: SubmissionState,
    progress: Box<dyn ProgressCallback>,
}

impl SubmissionClient {
    /// Obtain a credential, acquire a ticket from CAS and build a client
    pub async fn connect(
        config: ClientConfig,
        target: ServiceTarget,
        credentials: &dyn CredentialProvider,
    ) -> Result<Self> {
        config.validate()?;
        let granter = CasTicketGranter::new(&config)?;
        Self::with_granter(config, target, credentials, Box::new(granter)).await
    }

    /// Build a client that obtains tickets from `granter`
    pub async fn with_granter(
        config: ClientConfig,
        target: ServiceTarget,
        credentials: &dyn CredentialProvider,
        granter: Box<dyn TicketGranter>,
    ) -> Result<Self> {
        let credential = credentials.obtain()?;
        debug!(source = ?credentials.source(), service_target = %target, "obtained credential");

        let tickets = TicketProvider::new(
            granter,
            credential,
            config.service_url(target),
            config.ticket_timeout(),
        );
        let ticket = tickets.acquire().await?;

        Ok(Self {
            config,
            target,
            tickets,
            ticket,
            state: SubmissionState::Idle,
            progress: Box::new(NoopProgress),
        })
    }

    /// Report state changes to `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: Box<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Target chosen at construction
    pub const fn target(&self) -> ServiceTarget {
        self.target
    }

    /// URL submissions are posted to
    pub fn service_url(&self) -> &str {
        self.tickets.service_url()
    }

    /// State reached by the most recent call
    pub const fn last_state(&self) -> SubmissionState {
        self.state
    }

    /// Submit a job and return the filtered response text
    ///
    /// Fails with `Error::Validation` before any network traffic if the
    /// email address is missing or malformed.
    pub async fn submit(&mut self, form: &FormState) -> Result<String> {
        self.transition(SubmissionState::Idle).await;
        match self.run(form).await {
            Ok(text) => {
                self.transition(SubmissionState::Completed).await;
                Ok(text)
            }
            Err(e) => {
                debug!(error = %e, "submission failed");
                self.progress.on_error(&e).await;
                self.transition(SubmissionState::Failed).await;
                Err(e)
            }
        }
    }

    async fn run(&mut self, form: &FormState) -> Result<String> {
        validate::check(form)?;
        self.transition(SubmissionState::Validated).await;

        self.ticket = self.tickets.ensure_fresh(self.ticket.clone()).await?;
        self.transition(SubmissionState::TicketReady).await;

        let encoded = multipart::encode(form)?;
        let url = format!("{}?ticket={}", self.tickets.service_url(), self.ticket.value);

        // Dropped when this call returns, releasing its connections.
        let client = self.config.http_client()?;

        let mut response = post(&client, &url, &encoded).await?;
        self.transition(SubmissionState::Posted).await;

        if response.status() == StatusCode::FOUND {
            debug!("scheduler answered 302, reposting the same request");
            response.bytes().await.map_err(transport)?;
            response = post(&client, &url, &encoded).await?;
            self.transition(SubmissionState::RedirectRetried).await;
        }

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "scheduler returned a non-success status");
        }
        let body = response.text().await.map_err(transport)?;
        Ok(filter_response(&body))
    }

    async fn transition(&mut self, state: SubmissionState) {
        self.state = state;
        self.progress.on_state(state).await;
    }
}

async fn post(client: &Client, url: &str, encoded: &EncodedForm) -> Result<Response> {
    let target_url = url.split_once('?').map_or(url, |(base, _)| base);
    debug!(%target_url, bytes = encoded.body().len(), "posting job");
    let response = client
        .post(url)
        .header(USER_AGENT, BROWSER_USER_AGENT)
        .header(CONTENT_TYPE, encoded.content_type())
        .body(encoded.body().to_vec())
        .send()
        .await
        .map_err(transport)?;
    debug!(status = %response.status(), "scheduler responded");
    Ok(response)
}

/// Wrap a reqwest error without the request URL, which carries the ticket
fn transport(e: reqwest::Error) -> Error {
    Error::Transport(e.without_url())
}

/// Drop keep-alive lines and terminate each remaining line with `\n`
pub fn filter_response(body: &str) -> String {
    body.lines()
        .filter(|line| !line.starts_with(SENTINEL_PREFIX))
        .fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
}
