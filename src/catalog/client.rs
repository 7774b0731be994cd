//! Catalog client wrapping the shared HTTP client.

use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, instrument};

use super::error::CatalogError;
use crate::backup::BackupRecord;
use crate::config::{CompatMode, ConnectionConfig};
use crate::http::HttpClient;

/// Lists the backups available on the platform.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: HttpClient,
    compat: CompatMode,
}

impl CatalogClient {
    /// Creates a catalog client over a shared HTTP client.
    #[must_use]
    pub fn new(http: HttpClient, compat: CompatMode) -> Self {
        Self { http, compat }
    }

    /// Fetches and decodes the backup catalog.
    ///
    /// The whole body is read before decoding; its length is logged as
    /// `bytes_read`, separately from the decoded record count.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if:
    /// - The request fails (network error, timeout)
    /// - The server returns a non-2xx status (strict mode only)
    /// - The body is not a JSON array of backup objects
    #[instrument(skip(self, config), fields(url = %config.backups_url()))]
    pub async fn list_backups(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Vec<BackupRecord>, CatalogError> {
        let url = config.backups_url();
        info!("loading available backups");

        let response = self
            .http
            .get(&url, config)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::transport(&url, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "catalog response received");
        if self.compat == CompatMode::Strict && !status.is_success() {
            return Err(CatalogError::http_status(&url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::transport(&url, e))?;
        info!(bytes_read = body.len(), "catalog body read");

        let records = decode_catalog(&body).map_err(|e| CatalogError::decode(&url, e))?;
        info!(backups = records.len(), "backups available");
        Ok(records)
    }
}

/// Decodes a catalog body, preserving response order.
///
/// # Errors
///
/// Returns the JSON error when `body` is not an array of backup objects.
pub fn decode_catalog(body: &[u8]) -> Result<Vec<BackupRecord>, serde_json::Error> {
    serde_json::from_slice(body)
}
