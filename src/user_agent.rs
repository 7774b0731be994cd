//! User-Agent string sent with every platform request.

/// Default User-Agent for catalog and download requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("dgc-backup/{version} (backup-fetch)")
}
