//! Backup downloader wrapping the shared HTTP client.

use std::path::{Path, PathBuf};

use futures_util::{Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use super::error::DownloadError;
use crate::backup::SelectedBackup;
use crate::config::{CompatMode, ConnectionConfig};
use crate::http::HttpClient;

/// Streams backup archives to the configured backup directory.
#[derive(Debug, Clone)]
pub struct BackupDownloader {
    http: HttpClient,
    compat: CompatMode,
}

/// Where the archive went and how many bytes were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// `{backup-dir}/{name}.zip`
    pub path: PathBuf,
    /// Exact number of body bytes copied to `path`.
    pub bytes_written: u64,
}

impl BackupDownloader {
    /// Creates a downloader over a shared HTTP client.
    #[must_use]
    pub fn new(http: HttpClient, compat: CompatMode) -> Self {
        Self { http, compat }
    }

    /// Downloads the archive of `selected` into the backup directory.
    ///
    /// The not-found sentinel is not rejected here: it requests
    /// `{base}/rest/backup/file/` and writes `{backup-dir}/.zip`. Callers that
    /// want to stop early check [`SelectedBackup::is_empty`] first.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if:
    /// - The request fails (network error, timeout)
    /// - The server returns a non-2xx status (strict mode only)
    /// - The destination file cannot be created
    /// - The body fails mid-transfer or writing to disk fails
    #[must_use = "download outcome contains the archive path and size"]
    #[instrument(skip(self, selected, config), fields(id = %selected.id(), name = %selected.name()))]
    pub async fn download(
        &self,
        selected: &SelectedBackup,
        config: &ConnectionConfig,
    ) -> Result<DownloadOutcome, DownloadError> {
        let url = config.backup_file_url(selected.id());
        info!("downloading backup");

        let response = self
            .http
            .post(&url, config)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(key_form_body(&config.encryption_key))
            .send()
            .await
            .map_err(|e| DownloadError::transport(&url, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "download response received");
        if !status.is_success() {
            if self.compat == CompatMode::Strict {
                return Err(DownloadError::http_status(&url, status.as_u16()));
            }
            warn!(status = status.as_u16(), "writing error response body as archive");
        }

        let path = config.archive_path(selected.name());
        let file = File::create(&path)
            .await
            .map_err(|e| DownloadError::file_system(&path, e))?;

        let bytes_written =
            match stream_to_file(file, response.bytes_stream(), &url, &path).await {
                Ok(bytes) => bytes,
                Err(error) => {
                    debug!(path = %path.display(), "removing partial archive after error");
                    let _ = tokio::fs::remove_file(&path).await;
                    return Err(error);
                }
            };

        info!(path = %path.display(), bytes = bytes_written, "backup downloaded");
        Ok(DownloadOutcome {
            path,
            bytes_written,
        })
    }
}

/// `key=<urlencoded key>`
fn key_form_body(encryption_key: &str) -> String {
    format!("key={}", urlencoding::encode(encryption_key))
}

/// Streams `body` into `file`, returning the bytes written.
///
/// Takes ownership of the file: it is flushed and closed before this returns,
/// whether the copy succeeded or not.
async fn stream_to_file<S, B>(
    file: File,
    body: S,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut writer = BufWriter::new(file);
    let copied = copy_chunks(&mut writer, body, url, path).await;

    // Settle buffered and in-flight writes so dropping the handle closes it.
    let flushed = writer
        .flush()
        .await
        .map_err(|e| DownloadError::write(path, e));
    drop(writer);

    let bytes_written = copied?;
    flushed?;
    Ok(bytes_written)
}

async fn copy_chunks<W, S, B>(
    writer: &mut W,
    mut body: S,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError>
where
    W: AsyncWrite + Unpin,
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = body.next().await {
        let chunk =
            chunk_result.map_err(|e| DownloadError::interrupted(url, bytes_written, e))?;
        let chunk = chunk.as_ref();

        writer
            .write_all(chunk)
            .await
            .map_err(|e| DownloadError::write(path, e))?;

        bytes_written += chunk.len() as u64;
    }

    Ok(bytes_written)
}
