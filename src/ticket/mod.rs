//! Service tickets
//!
//! The scheduler accepts a request only with a CAS service ticket issued
//! for its URL. [`TicketProvider`] keeps the credential and target for a
//! client and decides when the held ticket must be replaced.

mod cas;

pub use cas::CasTicketGranter;

use crate::error::{Error, Result};
use crate::types::{Credential, Ticket};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info};

/// Exchanges a credential for a service ticket
///
/// Implemented by the CAS client; tests substitute their own.
#[async_trait]
pub trait TicketGranter: Send + Sync {
    /// Obtain a ticket string valid for `service_url`
    async fn grant(&self, credential: &Credential, service_url: &str) -> Result<String>;
}

/// Issues and refreshes the ticket for one client
pub struct TicketProvider {
    granter: Box<dyn TicketGranter>,
    credential: Credential,
    service_url: String,
    timeout: Duration,
}

impl TicketProvider {
    /// Create a provider
    ///
    /// A zero `timeout` makes every ticket stale, so a new one is requested
    /// before each submission.
    pub fn new(
        granter: Box<dyn TicketGranter>,
        credential: Credential,
        service_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            granter,
            credential,
            service_url: service_url.into(),
            timeout,
        }
    }

    /// URL tickets are scoped to
    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Request a new ticket
    pub async fn acquire(&self) -> Result<Ticket> {
        debug!(service = %self.service_url, "requesting service ticket");
        let value = self
            .granter
            .grant(&self.credential, &self.service_url)
            .await
            .map_err(|e| match e {
                Error::Auth(_) => e,
                other => Error::Auth(other.to_string()),
            })?;
        info!(service = %self.service_url, "acquired service ticket");
        Ok(Ticket::issued_now(value))
    }

    /// Whether `ticket` must be replaced at `now`
    pub fn is_stale(&self, ticket: &Ticket, now: DateTime<Utc>) -> bool {
        if self.timeout.is_zero() {
            return true;
        }
        let elapsed = (now - ticket.issued_at).to_std().unwrap_or_default();
        elapsed > self.timeout
    }

    /// Return `existing` if still fresh, otherwise a newly acquired ticket
    pub async fn ensure_fresh(&self, existing: Ticket) -> Result<Ticket> {
        if self.is_stale(&existing, Utc::now()) {
            debug!("service ticket is stale");
            self.acquire().await
        } else {
            debug!("reusing service ticket");
            Ok(existing)
        }
    }
}
