//! Core types shared across the client

use chrono::{DateTime, Utc};
use std::fmt;

/// Scheduler endpoint a client submits to
///
/// Chosen once when the client is built; each variant maps to its own URL
/// in [`ClientConfig`](crate::config::ClientConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceTarget {
    /// Batch scheduler (generic jobs, with or without result validation)
    BatchValidation,
    /// Interactive MetaMap
    InteractiveMetaMap,
    /// Interactive SemRep
    InteractiveSemRep,
    /// Interactive Medical Text Indexer
    InteractiveMti,
}

impl ServiceTarget {
    /// Map the legacy interactive program codes (100, 200, 300)
    pub const fn from_interactive_code(code: u16) -> Option<Self> {
        match code {
            100 => Some(Self::InteractiveMetaMap),
            200 => Some(Self::InteractiveSemRep),
            300 => Some(Self::InteractiveMti),
            _ => None,
        }
    }

    /// Whether this target runs jobs interactively
    pub const fn is_interactive(self) -> bool {
        !matches!(self, Self::BatchValidation)
    }
}

impl fmt::Display for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchValidation => write!(f, "batch"),
            Self::InteractiveMetaMap => write!(f, "interactive MetaMap"),
            Self::InteractiveSemRep => write!(f, "interactive SemRep"),
            Self::InteractiveMti => write!(f, "interactive MTI"),
        }
    }
}

/// Job variant marker sent as the `RUN_PROG` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunProg {
    /// Generic job, no end-of-result validation
    Generic,
    /// Generic job where the scheduler checks for the `<< EOT >>` marker
    #[default]
    GenericValidated,
}

impl RunProg {
    /// Wire value of the marker
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "GENERIC",
            Self::GenericValidated => "GENERIC_V",
        }
    }
}

/// Identity secret exchanged for tickets
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// UTS API key
    ApiKey(String),
    /// Legacy username and password
    UserPassword {
        /// Account name
        username: String,
        /// Account password
        password: String,
    },
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::UserPassword { username, .. } => f
                .debug_struct("UserPassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Service ticket authorizing submissions to one target URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Opaque ticket string (`ST-...`)
    pub value: String,
    /// When the ticket was obtained
    pub issued_at: DateTime<Utc>,
}

impl Ticket {
    /// Wrap a freshly issued ticket value
    pub fn issued_now(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            issued_at: Utc::now(),
        }
    }
}
