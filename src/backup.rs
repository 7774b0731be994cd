//! Backup records as returned by `GET /rest/backup`.
//!
//! Only [`BackupRecord::id`] and [`BackupInformation::name`] drive any logic;
//! the remaining fields are carried through for listing and logging.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One backup row from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    /// Platform identifier used in the download URL.
    pub id: String,
    /// Descriptive block holding the display name.
    #[serde(rename = "backupInformation")]
    pub information: BackupInformation,
    /// Creation time as a platform epoch value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<f64>,
    /// Last modification time as a platform epoch value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<f64>,
    /// Status per backup stage, keyed by stage name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub step_state_map: BTreeMap<String, BTreeMap<String, String>>,
    /// Archive size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// The `backupInformation` block of a backup row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInformation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_specification_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dgc_backup_options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repo_backup_options: Vec<String>,
}

impl BackupRecord {
    /// Builds a record with only the fields selection depends on.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            information: BackupInformation {
                name: name.into(),
                ..BackupInformation::default()
            },
            created_date: None,
            modified_date: None,
            step_state_map: BTreeMap::new(),
            size: None,
        }
    }

    /// Display name of the backup.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.information.name
    }
}

/// Outcome of matching the catalog against the expected backup name.
///
/// `NotFound` doubles as the empty sentinel: its identifier and name are both
/// empty strings.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedBackup {
    /// The first catalog record whose name matched.
    Found(BackupRecord),
    /// No record matched `expected_name`.
    NotFound {
        /// The name that was searched for.
        expected_name: String,
    },
}

impl SelectedBackup {
    /// Identifier for the download URL; empty when nothing matched.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Found(record) => &record.id,
            Self::NotFound { .. } => "",
        }
    }

    /// Name for the destination file; empty when nothing matched.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Found(record) => record.name(),
            Self::NotFound { .. } => "",
        }
    }

    /// True for the not-found sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The matched record, if any.
    #[must_use]
    pub fn record(&self) -> Option<&BackupRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound { .. } => None,
        }
    }
}
