//! CAS ticket exchange over HTTPS
//!
//! Two steps: the credential buys a ticket-granting ticket (TGT), which is
//! then asked for a service ticket scoped to the scheduler URL.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::ticket::TicketGranter;
use crate::types::Credential;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use reqwest::header::LOCATION;
use std::sync::LazyLock;
use tracing::debug;

/// `action="..."` of the form CAS returns in place of a `Location` header
static RE_FORM_ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<form[^>]*\baction\s*=\s*"([^"]+)""#).unwrap());

/// UTS CAS client
pub struct CasTicketGranter {
    client: Client,
    tgt_url: String,
    auth_url: String,
}

impl CasTicketGranter {
    /// Create a granter using the CAS endpoints, proxy and timeout from `config`
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            tgt_url: config.cas_tgt_url.clone(),
            auth_url: config.cas_auth_url.clone(),
        })
    }

    async fn ticket_granting_ticket(&self, credential: &Credential) -> Result<String> {
        let (endpoint, request) = match credential {
            Credential::ApiKey(key) => (
                &self.tgt_url,
                self.client
                    .post(&self.tgt_url)
                    .form(&[("apikey", key.as_str())]),
            ),
            Credential::UserPassword { username, password } => (
                &self.auth_url,
                self.client.post(&self.auth_url).form(&[
                    ("username", username.as_str()),
                    ("password", password.as_str()),
                ]),
            ),
        };

        debug!(endpoint = %endpoint, "requesting ticket-granting ticket");
        let response = request
            .send()
            .await
            .map_err(|e| auth_error("ticket-granting request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "ticket-granting service rejected the credential ({status})"
            )));
        }

        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            return resolve(endpoint, location);
        }

        let body = response
            .text()
            .await
            .map_err(|e| auth_error("failed to read ticket-granting response", e))?;
        let action = parse_form_action(&body).ok_or_else(|| {
            Error::Auth("ticket-granting response did not contain a ticket location".to_string())
        })?;
        resolve(endpoint, action)
    }

    async fn service_ticket(&self, tgt_location: &str, service_url: &str) -> Result<String> {
        debug!(service = %service_url, "requesting service ticket from TGT");
        let response = self
            .client
            .post(tgt_location)
            .form(&[("service", service_url)])
            .send()
            .await
            .map_err(|e| auth_error("service ticket request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Auth(format!(
                "service ticket request was rejected ({status})"
            )));
        }

        let ticket = response
            .text()
            .await
            .map_err(|e| auth_error("failed to read service ticket", e))?;
        let ticket = ticket.trim();
        if ticket.is_empty() {
            return Err(Error::Auth("CAS returned an empty service ticket".to_string()));
        }
        Ok(ticket.to_string())
    }
}

#[async_trait]
impl TicketGranter for CasTicketGranter {
    async fn grant(&self, credential: &Credential, service_url: &str) -> Result<String> {
        let tgt = self.ticket_granting_ticket(credential).await?;
        self.service_ticket(&tgt, service_url).await
    }
}

/// CAS failure without the request URL, which may be the TGT location
fn auth_error(context: &str, e: reqwest::Error) -> Error {
    Error::Auth(format!("{context}: {}", e.without_url()))
}

fn parse_form_action(html: &str) -> Option<&str> {
    RE_FORM_ACTION
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Resolve a possibly relative TGT location against the endpoint it came from
fn resolve(endpoint: &str, location: &str) -> Result<String> {
    let base = url::Url::parse(endpoint)
        .map_err(|e| Error::Config(format!("invalid CAS endpoint {endpoint}: {e}")))?;
    base.join(location)
        .map(String::from)
        .map_err(|e| Error::Auth(format!("CAS returned an invalid ticket location: {e}")))
}
