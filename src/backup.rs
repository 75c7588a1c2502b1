use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::error;

use crate::config;
use crate::models::{AppData, DayRecord, PeriodGoal, StateUpdate, TagOption};
use crate::storage::Storage;

/// Backup blob format version. Blobs from any other version are rejected.
pub const BACKUP_VERSION: &str = "1.0";

/// Import size cap.
const MAX_BACKUP_BYTES: usize = 5 * 1024 * 1024;

/// Rolling auto-backups kept under the `auto_backups` key.
const AUTO_BACKUP_KEEP: usize = 7;

/// A versioned, timestamped snapshot of the persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub version: String,
    pub timestamp: String,
    pub data: BackupData,
}

/// The four persisted state fields, as they travel in a backup blob.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BackupData {
    pub day_records: BTreeMap<String, DayRecord>,
    pub period_goals: BTreeMap<u32, PeriodGoal>,
    pub custom_emotions: Vec<TagOption>,
    pub custom_nourishments: Vec<TagOption>,
}

impl BackupData {
    pub fn snapshot(data: &AppData) -> Self {
        Self {
            day_records: data.day_records.clone(),
            period_goals: data.period_goals.clone(),
            custom_emotions: data.custom_emotions.clone(),
            custom_nourishments: data.custom_nourishments.clone(),
        }
    }

    /// The restore shape: all four fields applied in one `set_state` call.
    pub fn into_update(self) -> StateUpdate {
        StateUpdate {
            day_records: Some(self.day_records),
            period_goals: Some(self.period_goals),
            custom_emotions: Some(self.custom_emotions),
            custom_nourishments: Some(self.custom_nourishments),
            current_view: None,
            viewed_period_index: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BackupError {
    TooLarge,
    InvalidJson,
    MissingEnvelope,
    VersionMismatch { found: String },
    MissingField(&'static str),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::TooLarge => write!(f, "backup exceeds the 5 MB limit"),
            BackupError::InvalidJson => write!(f, "backup is not valid JSON"),
            BackupError::MissingEnvelope => {
                write!(f, "invalid backup format: missing version or data")
            }
            BackupError::VersionMismatch { found } => write!(
                f,
                "incompatible backup version {found} (expected {BACKUP_VERSION})"
            ),
            BackupError::MissingField(field) => {
                write!(f, "invalid backup structure: missing {field}")
            }
        }
    }
}

impl std::error::Error for BackupError {}

/// Serializes the current state into a downloadable backup blob.
pub fn create_backup(data: &AppData, timestamp: &str) -> Result<String, serde_json::Error> {
    let backup = Backup {
        version: BACKUP_VERSION.to_string(),
        timestamp: timestamp.to_string(),
        data: BackupData::snapshot(data),
    };
    serde_json::to_string_pretty(&backup)
}

/// Validates a backup blob and extracts its data section.
///
/// Checks run in order: size cap, JSON parse, envelope presence, version
/// match, required fields. Tag lists are optional and default to empty;
/// `day_records` and `period_goals` are required.
pub fn parse_backup(blob: &str) -> Result<BackupData, BackupError> {
    if blob.len() > MAX_BACKUP_BYTES {
        return Err(BackupError::TooLarge);
    }

    let value: serde_json::Value =
        serde_json::from_str(blob).map_err(|_| BackupError::InvalidJson)?;

    let version = value.get("version").and_then(|v| v.as_str());
    let data = value.get("data").filter(|d| d.is_object());
    let (version, data) = match (version, data) {
        (Some(version), Some(data)) => (version, data),
        _ => return Err(BackupError::MissingEnvelope),
    };

    if version != BACKUP_VERSION {
        return Err(BackupError::VersionMismatch {
            found: version.to_string(),
        });
    }

    for field in ["day_records", "period_goals"] {
        if data.get(field).is_none() {
            return Err(BackupError::MissingField(field));
        }
    }

    serde_json::from_value(data.clone()).map_err(|_| BackupError::InvalidJson)
}

/// Prepends a snapshot to the rolling auto-backup list, keeping the newest
/// [`AUTO_BACKUP_KEEP`]. Called by the store on every data mutation while
/// the `auto_backup_enabled` flag is on.
pub fn record_auto_backup(storage: &Storage, data: &AppData, timestamp: &str) {
    let mut backups = auto_backups(storage);
    backups.insert(
        0,
        Backup {
            version: BACKUP_VERSION.to_string(),
            timestamp: timestamp.to_string(),
            data: BackupData::snapshot(data),
        },
    );
    backups.truncate(AUTO_BACKUP_KEEP);

    match serde_json::to_string(&backups) {
        Ok(json) => storage.set(config::keys::AUTO_BACKUPS, &json),
        Err(err) => error!("failed to serialize auto backups: {err}"),
    }
}

/// The stored auto-backup list, newest first. Malformed storage reads as
/// empty.
pub fn auto_backups(storage: &Storage) -> Vec<Backup> {
    storage
        .get(config::keys::AUTO_BACKUPS)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> AppData {
        let mut data = AppData::default();
        data.day_records.insert(
            "2026-04-02".to_string(),
            DayRecord {
                mood: Some(4),
                journal: "spring".to_string(),
                ..DayRecord::default()
            },
        );
        data.period_goals.insert(
            10,
            PeriodGoal {
                goal: "ship it".to_string(),
                ..PeriodGoal::default()
            },
        );
        data
    }

    #[test]
    fn backup_round_trips() {
        let data = sample_data();
        let blob = create_backup(&data, "2026-04-02T12:00:00+08:00").unwrap();
        let restored = parse_backup(&blob).unwrap();
        assert_eq!(restored, BackupData::snapshot(&data));
    }

    #[test]
    fn rejects_oversized_blobs() {
        let blob = "x".repeat(MAX_BACKUP_BYTES + 1);
        assert_eq!(parse_backup(&blob), Err(BackupError::TooLarge));
    }

    #[test]
    fn rejects_invalid_json() {
        assert_eq!(parse_backup("{not json"), Err(BackupError::InvalidJson));
    }

    #[test]
    fn rejects_missing_envelope() {
        assert_eq!(
            parse_backup(r#"{"data":{}}"#),
            Err(BackupError::MissingEnvelope)
        );
        assert_eq!(
            parse_backup(r#"{"version":"1.0"}"#),
            Err(BackupError::MissingEnvelope)
        );
    }

    #[test]
    fn rejects_version_mismatch() {
        let blob = r#"{"version":"0.9","data":{"day_records":{},"period_goals":{}}}"#;
        assert_eq!(
            parse_backup(blob),
            Err(BackupError::VersionMismatch {
                found: "0.9".to_string()
            })
        );
    }

    #[test]
    fn rejects_missing_required_fields() {
        let blob = r#"{"version":"1.0","data":{"period_goals":{}}}"#;
        assert_eq!(
            parse_backup(blob),
            Err(BackupError::MissingField("day_records"))
        );

        let blob = r#"{"version":"1.0","data":{"day_records":{}}}"#;
        assert_eq!(
            parse_backup(blob),
            Err(BackupError::MissingField("period_goals"))
        );
    }

    #[test]
    fn tag_lists_default_to_empty() {
        let blob = r#"{"version":"1.0","data":{"day_records":{},"period_goals":{}}}"#;
        let data = parse_backup(blob).unwrap();
        assert!(data.custom_emotions.is_empty());
        assert!(data.custom_nourishments.is_empty());
    }

    #[test]
    fn auto_backups_keep_the_newest_seven() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let data = sample_data();

        for i in 1..=9 {
            record_auto_backup(&storage, &data, &format!("2026-04-0{i}T00:00:00Z"));
        }

        let backups = auto_backups(&storage);
        assert_eq!(backups.len(), 7);
        assert_eq!(backups[0].timestamp, "2026-04-09T00:00:00Z");
    }
}
