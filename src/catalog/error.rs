//! Error types for the catalog module.

use thiserror::Error;

/// Errors that can occur while listing backups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error listing backups at {url}: {source}")]
    Transport {
        /// The catalog URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout listing backups at {url}")]
    Timeout {
        /// The catalog URL.
        url: String,
    },

    /// Non-2xx response (strict mode only).
    #[error("HTTP {status} listing backups at {url}")]
    HttpStatus {
        /// The catalog URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body is not a JSON array of backup objects.
    #[error("malformed backup catalog from {url}: {source}")]
    Decode {
        /// The catalog URL.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Maps a reqwest error to `Timeout` or `Transport`.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Transport {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }
}
