//! Backup catalog listing.
//!
//! Issues `GET {base}/rest/backup` with Basic authentication and decodes the
//! JSON array body into [`BackupRecord`](crate::backup::BackupRecord)s, in
//! the order the platform returned them.
//!
//! # Example
//!
//! ```no_run
//! use dgc_backup::{CatalogClient, CompatMode, ConnectionConfig, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectionConfig::load(Path::new("creds.json"))?;
//! let catalog = CatalogClient::new(HttpClient::new()?, CompatMode::Strict);
//! for record in catalog.list_backups(&config).await? {
//!     println!("{} {}", record.id, record.name());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{CatalogClient, decode_catalog};
pub use error::CatalogError;
