#![allow(dead_code)]

pub mod socket_guard;

use std::path::Path;

use dgc_backup::ConnectionConfig;

/// Credentials pointing at `base` that write archives into `dir`.
pub fn config_for(base: &str, dir: &Path, format: &str) -> ConnectionConfig {
    config_with_key(base, dir, format, "archive-key")
}

/// Like [`config_for`] with an explicit encryption key.
pub fn config_with_key(base: &str, dir: &Path, format: &str, key: &str) -> ConnectionConfig {
    let raw = serde_json::json!({
        "dgc": base,
        "username": "admin",
        "password": "secret",
        "encryption-key": key,
        "backup-dir": dir,
        "backup-format": format,
    })
    .to_string();
    ConnectionConfig::from_json_str(&raw).expect("valid test credentials")
}

/// `Authorization` value for admin:secret.
pub const ADMIN_BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

/// A catalog row as the platform serializes it.
pub fn catalog_row(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "createdDate": 1_709_596_800_000_u64,
        "modifiedDate": 1_709_600_400_000_u64,
        "id": id,
        "backupInformation": {
            "name": name,
            "createdByEmail": "ops@example.com",
            "dgcBackupOptions": ["CUSTOMIZATIONS"],
            "repoBackupOptions": ["DATA"]
        },
        "stepStateMap": {"REPOSITORY": {"state": "COMPLETED"}},
        "size": 1024
    })
}
