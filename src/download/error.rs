//! Error types for the download module.
//!
//! This module defines structured errors for the archive transfer,
//! providing context-rich error messages for debugging and operator feedback.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a backup archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error before a response arrived (DNS, connection refused, TLS, etc.)
    #[error("network error downloading {url}: {source}")]
    Transport {
        /// The download URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The download URL.
        url: String,
    },

    /// Non-2xx response (strict mode only).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The download URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The destination file could not be created.
    #[error("cannot create archive file {path}: {source}")]
    FileSystem {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The response body failed part way through the transfer.
    #[error("transfer from {url} interrupted after {bytes_written} bytes: {source}")]
    Interrupted {
        /// The download URL.
        url: String,
        /// Bytes written to disk before the failure.
        bytes_written: u64,
        /// The underlying body error.
        #[source]
        source: reqwest::Error,
    },

    /// Writing or flushing the destination file failed.
    #[error("IO error writing to {path}: {source}")]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Maps a request error to `Timeout` or `Transport`.
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

    /// Creates a destination-creation error.
    pub fn file_system(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Creates a mid-stream transfer error.
    pub fn interrupted(url: impl Into<String>, bytes_written: u64, source: reqwest::Error) -> Self {
        Self::Interrupted {
            url: url.into(),
            bytes_written,
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

// Like the catalog errors, there is no `From<reqwest::Error>` or
// `From<std::io::Error>`: every variant needs the URL or path for context.
