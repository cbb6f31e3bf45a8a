//! Leaderboard persistence
//!
//! The simulation only ever asks a [`ScoreStore`] to load or save ranked
//! records, and only on phase transitions. Stores swallow their own failures:
//! a broken file reads as an empty leaderboard, a failed write is logged.
//!
//! Features of the JSON file store:
//! - Versioned JSON envelope
//! - Atomic replace (write tmp, then rename over the save)
//! - Corrupt or foreign files are treated as empty

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::highscores::{self, ScoreRecord};

/// Load/persist collaborator for ranked records.
pub trait ScoreStore {
    /// Ranked records, or an empty list if none can be read.
    fn load(&mut self) -> Vec<ScoreRecord>;
    /// Best-effort write.
    fn save(&mut self, records: &[ScoreRecord]);
}

const ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    records: Vec<ScoreRecord>,
}

/// Leaderboard stored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Read the file; `Ok(None)` if it does not exist yet.
    pub fn try_load(&self) -> Result<Option<Vec<ScoreRecord>>, PersistError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.version != ENVELOPE_VERSION {
            log::warn!(
                "Leaderboard {} has unknown version {}, ignoring it",
                self.path.display(),
                envelope.version
            );
            return Ok(Some(Vec::new()));
        }
        let mut records = envelope.records;
        highscores::normalize(&mut records);
        Ok(Some(records))
    }

    pub fn try_save(&self, records: &[ScoreRecord]) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            records: records.to_vec(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Vec<ScoreRecord> {
        match self.try_load() {
            Ok(Some(records)) => {
                log::info!("Loaded {} high scores", records.len());
                records
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Vec::new()
            }
            Err(err) => {
                log::warn!(
                    "Could not read high scores from {}: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, records: &[ScoreRecord]) {
        match self.try_save(records) {
            Ok(()) => log::info!("High scores saved ({} entries)", records.len()),
            Err(err) => log::warn!(
                "Could not save high scores to {}: {}",
                self.path.display(),
                err
            ),
        }
    }
}

/// In-process store; also counts calls so tests can check when I/O happens.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub records: Vec<ScoreRecord>,
    pub loads: u32,
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Vec<ScoreRecord> {
        self.loads += 1;
        let mut records = self.records.clone();
        highscores::normalize(&mut records);
        records
    }

    fn save(&mut self, records: &[ScoreRecord]) {
        self.saves += 1;
        self.records = records.to_vec();
    }
}

/// Store that never remembers anything (headless runs without a file).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl ScoreStore for NullStore {
    fn load(&mut self) -> Vec<ScoreRecord> {
        Vec::new()
    }

    fn save(&mut self, _records: &[ScoreRecord]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_path(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!(
            "ninja_pup_{}_{}_{}.json",
            tag,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let mut store = JsonFileStore::new(scratch_path("missing"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip");
        let mut store = JsonFileStore::new(&path);
        let records = vec![
            ScoreRecord::new("AKI", 320, 81.5),
            ScoreRecord::new("BO", 120, 40.0),
        ];
        store.save(&records);
        assert!(!store.tmp_path().exists());

        let mut reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load(), records);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = scratch_path("corrupt");
        fs::write(&path, "{ this is not json").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.try_load(), Err(PersistError::Parse(_))));
        assert!(store.load().is_empty());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        // Parent "directory" is a regular file.
        let blocker = scratch_path("blocker");
        fs::write(&blocker, "").unwrap();
        let store = JsonFileStore::new(blocker.join("scores.json"));
        assert!(store.try_save(&[ScoreRecord::new("X", 1, 1.0)]).is_err());
        let mut store = store;
        store.save(&[ScoreRecord::new("X", 1, 1.0)]);
        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn test_memory_store_counts_and_ranks() {
        let mut store = MemoryStore::with_records(vec![
            ScoreRecord::new("low", 5, 1.0),
            ScoreRecord::new("high", 50, 1.0),
        ]);
        let loaded = store.load();
        assert_eq!(loaded[0].name, "high");
        store.save(&loaded);
        assert_eq!((store.loads, store.saves), (1, 1));
    }
}
