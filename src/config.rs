//! Client configuration
//!
//! Defaults are overlaid by an optional TOML file and then by `SKRAPI_*`
//! environment variables. The resulting [`ClientConfig`] is passed to the
//! client explicitly; nothing is read from the environment afterwards.

use crate::error::{Error, Result};
use crate::types::ServiceTarget;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CAS_TGT_URL: &str = "https://utslogin.nlm.nih.gov/cas/v1/api-key";
const DEFAULT_CAS_AUTH_URL: &str = "https://utslogin.nlm.nih.gov/cas/v1/tickets";
const DEFAULT_SERVICE_BASE: &str = "https://ii.nlm.nih.gov/cgi-bin/II/UTS_Required";

/// Which credential provider to build when none is injected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialSelection {
    /// Prompt for an API key on the terminal
    #[default]
    Console,
    /// Prompt for username and password on the terminal
    ConsolePassword,
    /// Read `UTS_API_KEY` from the environment
    Env,
    /// Use the API key given on the command line
    ApiKey,
}

impl FromStr for CredentialSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "console" => Ok(Self::Console),
            "console-password" => Ok(Self::ConsolePassword),
            "env" => Ok(Self::Env),
            "api-key" => Ok(Self::ApiKey),
            other => Err(Error::Config(format!(
                "unknown credential provider '{other}' (expected console, console-password, env or api-key)"
            ))),
        }
    }
}

impl fmt::Display for CredentialSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => write!(f, "console"),
            Self::ConsolePassword => write!(f, "console-password"),
            Self::Env => write!(f, "env"),
            Self::ApiKey => write!(f, "api-key"),
        }
    }
}

/// HTTP proxy used for ticket and submission requests
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProxyConfig {
    /// Hostname or IP of the proxy
    pub host: String,
    /// Proxy port
    #[serde(default = "default_proxy_port")]
    pub port: u16,
    /// Proxy scheme (`http`, `https`, `socks5`)
    #[serde(default = "default_proxy_protocol")]
    pub protocol: String,
}

const fn default_proxy_port() -> u16 {
    8080
}

fn default_proxy_protocol() -> String {
    "http".to_string()
}

impl ProxyConfig {
    /// Proxy URL in `protocol://host:port` form
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Build a reqwest proxy routing all traffic through this proxy
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy> {
        reqwest::Proxy::all(self.url())
            .map_err(|e| Error::Config(format!("invalid proxy {}: {e}", self.url())))
    }
}

/// Configuration for ticket acquisition and job submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Endpoint issuing ticket-granting tickets for API keys
    pub cas_tgt_url: String,
    /// Endpoint issuing ticket-granting tickets for username/password
    pub cas_auth_url: String,
    /// Batch scheduler URL
    pub batch_url: String,
    /// Interactive MetaMap URL
    pub metamap_url: String,
    /// Interactive SemRep URL
    pub semrep_url: String,
    /// Interactive MTI URL
    pub mti_url: String,
    /// Seconds a service ticket is reused; 0 refreshes before every submission
    pub ticket_timeout_secs: u64,
    /// Per-request timeout in seconds; 0 waits indefinitely
    pub request_timeout_secs: u64,
    /// Optional HTTP proxy
    pub proxy: Option<ProxyConfig>,
    /// Credential provider to use when the caller does not inject one
    pub credentials: CredentialSelection,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cas_tgt_url: DEFAULT_CAS_TGT_URL.to_string(),
            cas_auth_url: DEFAULT_CAS_AUTH_URL.to_string(),
            batch_url: format!("{DEFAULT_SERVICE_BASE}/API_batchValidationII.pl"),
            metamap_url: format!("{DEFAULT_SERVICE_BASE}/API_MM_interactive.pl"),
            semrep_url: format!("{DEFAULT_SERVICE_BASE}/API_SR_interactive.pl"),
            mti_url: format!("{DEFAULT_SERVICE_BASE}/API_MTI_interactive.pl"),
            ticket_timeout_secs: 0,
            request_timeout_secs: 0,
            proxy: None,
            credentials: CredentialSelection::default(),
        }
    }
}

impl ClientConfig {
    /// Default location of the config file (`<config dir>/skr-client/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skr-client").join("config.toml"))
    }

    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("invalid config file: {e}")))
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist. Without one, the default path is tried
    /// and defaults are used when it does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if required {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config file");
        let text = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&text)
    }

    /// Overlay `SKRAPI_*` values obtained through `lookup`
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_vars: [(&str, &mut String); 6] = [
            ("SKRAPI_CAS_TGT_URL", &mut self.cas_tgt_url),
            ("SKRAPI_CAS_AUTH_URL", &mut self.cas_auth_url),
            ("SKRAPI_SERVICE_URL", &mut self.batch_url),
            ("SKRAPI_SERVICE_MM_URL", &mut self.metamap_url),
            ("SKRAPI_SERVICE_SR_URL", &mut self.semrep_url),
            ("SKRAPI_SERVICE_MTI_URL", &mut self.mti_url),
        ];
        for (key, slot) in string_vars {
            if let Some(value) = lookup(key) {
                *slot = value.trim().to_string();
            }
        }

        if let Some(value) = lookup("SKRAPI_TICKET_TIMEOUT") {
            self.ticket_timeout_secs = parse_number("SKRAPI_TICKET_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("SKRAPI_REQUEST_TIMEOUT") {
            self.request_timeout_secs = parse_number("SKRAPI_REQUEST_TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("SKRAPI_CREDENTIALS") {
            self.credentials = value.parse()?;
        }

        if let Some(host) = lookup("SKRAPI_PROXY_HOST") {
            let mut proxy = self.proxy.take().unwrap_or_else(|| ProxyConfig {
                host: String::new(),
                port: default_proxy_port(),
                protocol: default_proxy_protocol(),
            });
            proxy.host = host.trim().to_string();
            self.proxy = Some(proxy);
        }
        if let Some(proxy) = self.proxy.as_mut() {
            if let Some(port) = lookup("SKRAPI_PROXY_PORT") {
                proxy.port = parse_number("SKRAPI_PROXY_PORT", &port)?;
            }
            if let Some(protocol) = lookup("SKRAPI_PROXY_PROTOCOL") {
                proxy.protocol = protocol.trim().to_string();
            }
        }

        Ok(self)
    }

    /// Load the default config file and overlay the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(None)?.apply_env(|key| std::env::var(key).ok())
    }

    /// Check that every configured URL parses
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("cas_tgt_url", &self.cas_tgt_url),
            ("cas_auth_url", &self.cas_auth_url),
            ("batch_url", &self.batch_url),
            ("metamap_url", &self.metamap_url),
            ("semrep_url", &self.semrep_url),
            ("mti_url", &self.mti_url),
        ];
        for (name, value) in urls {
            url::Url::parse(value)
                .map_err(|e| Error::Config(format!("{name} is not a valid URL ({value}): {e}")))?;
        }
        if self.proxy.as_ref().is_some_and(|p| p.host.is_empty()) {
            return Err(Error::Config("proxy host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Service URL for a target
    pub fn service_url(&self, target: ServiceTarget) -> &str {
        match target {
            ServiceTarget::BatchValidation => &self.batch_url,
            ServiceTarget::InteractiveMetaMap => &self.metamap_url,
            ServiceTarget::InteractiveSemRep => &self.semrep_url,
            ServiceTarget::InteractiveMti => &self.mti_url,
        }
    }

    /// Ticket reuse window
    pub const fn ticket_timeout(&self) -> Duration {
        Duration::from_secs(self.ticket_timeout_secs)
    }

    /// Request timeout, if one is configured
    pub const fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    /// Build an HTTP client honoring proxy and timeout settings
    ///
    /// Redirects are never followed; the submission protocol handles 302
    /// responses itself.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(proxy.to_reqwest()?);
        }
        builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key} must be a number, got '{value}'")))
}
