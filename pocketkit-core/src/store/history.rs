use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use super::{FORMAT_VERSION, Stored, check_version, read_stored, write_document};
use crate::{
    bmi::BmiCategory,
    error::{InputError, Result, StoreError},
    model::BmiRecord,
};

type Users = BTreeMap<String, Vec<BmiRecord>>;

#[derive(Serialize)]
struct HistoryDocumentRef<'a> {
    version: u32,
    users: &'a Users,
}

#[derive(Deserialize)]
struct HistoryDocument {
    version: u32,
    users: Users,
}

/// Unversioned files are a bare `{ name: [record, ...] }` map.
type StoredHistory = Stored<HistoryDocument, Users>;

/// Per-user BMI records, in the order they were saved.
#[derive(Debug, Default)]
pub struct BmiHistory {
    path: Option<PathBuf>,
    users: Users,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub users: usize,
    pub records: usize,
}

/// Change between a user's first and latest saved record.
#[derive(Debug, Clone, PartialEq)]
pub struct BmiTrend {
    pub records: usize,
    pub since: NaiveDateTime,
    pub until: NaiveDateTime,
    pub first_bmi: f64,
    pub latest_bmi: f64,
    pub min_bmi: f64,
    pub max_bmi: f64,
    pub bmi_change: f64,
    pub weight_change_kg: f64,
    pub first_category: BmiCategory,
    pub latest_category: BmiCategory,
}

impl BmiHistory {
    /// A history that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the history at `path`, or start empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let users = match read_stored(&path)? {
            None => Users::new(),
            Some(StoredHistory::Versioned(document)) => {
                check_version(document.version, &path);
                document.users
            }
            Some(StoredHistory::Legacy(users)) => {
                tracing::info!(path = %path.display(), "loaded unversioned BMI history");
                users
            }
        };

        Ok(Self {
            path: Some(path),
            users,
        })
    }

    /// Start over at `path` with an empty history, without reading what is
    /// there. Unreadable or corrupt files are replaced too.
    pub fn reset(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let history = Self {
            path: Some(path.into()),
            users: Users::new(),
        };
        history.persist()?;
        tracing::info!("BMI history reset");
        Ok(history)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append `record` to `user`'s history and persist.
    ///
    /// The record stays in memory even if writing the file fails.
    pub fn add(&mut self, user: &str, record: BmiRecord) -> Result<()> {
        let user = user.trim();
        if user.is_empty() {
            return Err(InputError::EmptyField("name").into());
        }

        self.users
            .entry(user.to_string())
            .or_default()
            .push(record);

        tracing::debug!(user, "BMI record added");
        self.persist()?;
        Ok(())
    }

    pub fn records(&self, user: &str) -> &[BmiRecord] {
        self.users
            .get(user.trim())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            users: self.users.len(),
            records: self.users.values().map(Vec::len).sum(),
        }
    }

    pub fn trend(&self, user: &str) -> Result<BmiTrend, InputError> {
        let records = self.records(user);

        if records.len() < 2 {
            return Err(InputError::NotEnoughRecords {
                user: user.trim().to_string(),
                found: records.len(),
            });
        }
        let first = &records[0];
        let latest = &records[records.len() - 1];

        let min_bmi = records.iter().map(|r| r.bmi).fold(f64::INFINITY, f64::min);
        let max_bmi = records
            .iter()
            .map(|r| r.bmi)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(BmiTrend {
            records: records.len(),
            since: first.timestamp,
            until: latest.timestamp,
            first_bmi: first.bmi,
            latest_bmi: latest.bmi,
            min_bmi,
            max_bmi,
            bmi_change: latest.bmi - first.bmi,
            weight_change_kg: latest.weight_kg - first.weight_kg,
            first_category: first.category,
            latest_category: latest.category,
        })
    }

    /// Remove every user and record.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.users.clear();
        tracing::info!("BMI history cleared");
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        write_document(
            path,
            &HistoryDocumentRef {
                version: FORMAT_VERSION,
                users: &self.users,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bmi::{Height, HeightUnit, Weight, WeightUnit, assess},
        error::Error,
        model::TIMESTAMP_FORMAT,
    };
    use std::fs;
    use tempfile::TempDir;

    fn record(weight_kg: &str, timestamp: &str) -> BmiRecord {
        let weight = Weight::parse(weight_kg, WeightUnit::Kg).unwrap();
        let height = Height::parse("180", HeightUnit::Cm).unwrap();
        let assessment = assess(&weight, &height).unwrap();
        let ts = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).unwrap();
        BmiRecord::new(&assessment, &weight, &height, ts)
    }

    #[test]
    fn records_are_kept_per_user_in_order() {
        let mut history = BmiHistory::in_memory();

        history.add("alice", record("60", "2024-01-01 09:00:00")).unwrap();
        history.add("bob", record("90", "2024-01-02 09:00:00")).unwrap();
        history.add(" alice ", record("62", "2024-02-01 09:00:00")).unwrap();

        let alice = history.records("alice");
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[0].weight_kg, 60.0);
        assert_eq!(alice[1].weight_kg, 62.0);
        assert_eq!(history.users().collect::<Vec<_>>(), vec!["alice", "bob"]);
        assert_eq!(
            history.stats(),
            HistoryStats {
                users: 2,
                records: 3
            }
        );
    }

    #[test]
    fn empty_name_is_rejected_without_mutation() {
        let mut history = BmiHistory::in_memory();

        let err = history.add("   ", record("70", "2024-01-01 09:00:00")).unwrap_err();

        assert!(matches!(err, Error::Input(InputError::EmptyField("name"))));
        assert_eq!(history.stats(), HistoryStats::default());
    }

    #[test]
    fn unknown_user_has_no_records() {
        let history = BmiHistory::in_memory();
        assert!(history.records("nobody").is_empty());
    }

    #[test]
    fn trend_needs_two_records() {
        let mut history = BmiHistory::in_memory();
        history.add("carol", record("70", "2024-01-01 09:00:00")).unwrap();

        let err = history.trend("carol").unwrap_err();

        assert_eq!(
            err,
            InputError::NotEnoughRecords {
                user: "carol".into(),
                found: 1
            }
        );
    }

    #[test]
    fn trend_compares_first_and_latest() {
        let mut history = BmiHistory::in_memory();
        history.add("dave", record("100", "2024-01-01 09:00:00")).unwrap();
        history.add("dave", record("80", "2024-03-01 09:00:00")).unwrap();
        history.add("dave", record("90", "2024-06-01 09:00:00")).unwrap();

        let trend = history.trend("dave").unwrap();

        assert_eq!(trend.records, 3);
        assert!((trend.weight_change_kg - -10.0).abs() < 1e-9);
        assert!(trend.bmi_change < 0.0);
        assert!((trend.min_bmi - 80.0 / (1.8 * 1.8)).abs() < 1e-9);
        assert!((trend.max_bmi - 100.0 / (1.8 * 1.8)).abs() < 1e-9);
        assert_eq!(trend.first_category, BmiCategory::Obese);
        assert_eq!(trend.latest_category, BmiCategory::Overweight);
    }

    #[test]
    fn history_round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");

        let mut history = BmiHistory::open(&path).unwrap();
        history.add("erin", record("55", "2024-01-01 09:00:00")).unwrap();

        let reopened = BmiHistory::open(&path).unwrap();
        assert_eq!(reopened.records("erin"), history.records("erin"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], FORMAT_VERSION);
        assert!(raw["users"]["erin"].is_array());
    }

    #[test]
    fn legacy_map_file_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");
        fs::write(
            &path,
            r#"{
              "frank": [
                {
                  "timestamp": "2023-05-01 12:00:00",
                  "weight": 81.6466,
                  "height": 1.8288,
                  "bmi": 24.41,
                  "category": "Normal weight",
                  "original_weight": 180.0,
                  "original_weight_unit": "lb",
                  "original_height": 6.0,
                  "original_height_unit": "ft"
                }
              ]
            }"#,
        )
        .unwrap();

        let history = BmiHistory::open(&path).unwrap();

        let records = history.records("frank");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_weight(), (180.0, WeightUnit::Lb));
        assert_eq!(records[0].display_height(), (6.0, HeightUnit::Ft));
    }

    #[test]
    fn newer_version_still_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");
        fs::write(&path, r#"{"version": 7, "users": {}, "extra": true}"#).unwrap();

        let history = BmiHistory::open(&path).unwrap();
        assert_eq!(history.stats(), HistoryStats::default());
    }

    #[test]
    fn clear_removes_everything_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");

        let mut history = BmiHistory::open(&path).unwrap();
        history.add("gina", record("70", "2024-01-01 09:00:00")).unwrap();
        history.clear().unwrap();

        assert_eq!(history.stats(), HistoryStats::default());
        assert_eq!(BmiHistory::open(&path).unwrap().stats(), HistoryStats::default());
    }

    #[test]
    fn reset_replaces_a_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");
        fs::write(&path, "{ truncated").unwrap();
        assert!(BmiHistory::open(&path).is_err());

        let history = BmiHistory::reset(&path).unwrap();

        assert_eq!(history.stats(), HistoryStats::default());
        assert_eq!(BmiHistory::open(&path).unwrap().stats(), HistoryStats::default());
    }

    #[test]
    fn bad_timestamp_error_points_at_the_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");
        fs::write(
            &path,
            r#"{
  "version": 1,
  "users": {
    "ivy": [
      {
        "timestamp": "2024-13-45 00:00:00",
        "weight_kg": 70.0,
        "height_m": 1.75,
        "bmi": 22.86,
        "category": "Normal weight"
      }
    ]
  }
}"#,
        )
        .unwrap();

        let err = BmiHistory::open(&path).unwrap_err();

        let message = err.to_string();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(!message.contains("untagged"), "{message}");
        assert!(message.contains("line 6"), "{message}");
    }

    #[test]
    fn failed_write_keeps_memory_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bmi_data.json");
        let mut history = BmiHistory::open(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = history.add("hank", record("70", "2024-01-01 09:00:00")).unwrap_err();

        assert!(matches!(err, Error::Store(StoreError::Write { .. })));
        assert_eq!(history.records("hank").len(), 1);
    }
}
