//! Shared HTTP client policy for platform requests.
//!
//! Both the catalog listing and the archive download go through one
//! [`HttpClient`], so timeouts, user agent and authentication stay consistent.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, RequestBuilder};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::user_agent;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default per-read timeout (5 minutes, archives can stall between chunks).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Connect and read timeouts in seconds. Zero disables the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Connect timeout in seconds.
    pub connect_secs: u64,
    /// Idle time allowed between body reads, in seconds.
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

impl HttpTimeouts {
    /// Applies the optional overrides from the credential file.
    #[must_use]
    pub fn from_config(config: &ConnectionConfig) -> Self {
        let defaults = Self::default();
        Self {
            connect_secs: config.connect_timeout_secs.unwrap_or(defaults.connect_secs),
            read_secs: config.read_timeout_secs.unwrap_or(defaults.read_secs),
        }
    }
}

/// HTTP client shared by the catalog and download components.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(HttpTimeouts::default())
    }

    /// Creates a client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns the builder error when the TLS backend cannot be initialized.
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, reqwest::Error> {
        debug!(?timeouts, "building HTTP client");
        let client = base_client_builder(timeouts).build()?;
        Ok(Self { client })
    }

    /// Starts a GET request carrying the Basic-auth header for `config`.
    pub(crate) fn get(&self, url: &str, config: &ConnectionConfig) -> RequestBuilder {
        authorized(self.client.get(url), config)
    }

    /// Starts a POST request carrying the Basic-auth header for `config`.
    pub(crate) fn post(&self, url: &str, config: &ConnectionConfig) -> RequestBuilder {
        authorized(self.client.post(url), config)
    }
}

/// Adds `Authorization: Basic base64(username:password)`.
fn authorized(request: RequestBuilder, config: &ConnectionConfig) -> RequestBuilder {
    request.basic_auth(&config.username, Some(&config.password))
}

fn base_client_builder(timeouts: HttpTimeouts) -> ClientBuilder {
    let mut builder = Client::builder().user_agent(user_agent::default_user_agent());
    if timeouts.connect_secs > 0 {
        builder = builder.connect_timeout(Duration::from_secs(timeouts.connect_secs));
    }
    if timeouts.read_secs > 0 {
        builder = builder.read_timeout(Duration::from_secs(timeouts.read_secs));
    }
    builder
}
